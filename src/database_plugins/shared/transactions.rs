// ABOUTME: RAII transaction guard for multi-statement database writes
// ABOUTME: Rolls back automatically when dropped without an explicit commit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Transaction management with an RAII guard
//!
//! ```text
//! let mut guard = TransactionGuard::new(pool.begin().await?);
//!
//! sqlx::query("UPDATE payouts ...").execute(guard.executor()?).await?;
//! sqlx::query("INSERT INTO credit_transactions ...").execute(guard.executor()?).await?;
//!
//! // Returning early with `?` above drops the guard and rolls back.
//! guard.commit().await?;
//! ```

use sqlx::{Database, Transaction};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};

/// Wraps a `SQLx` transaction so every early return rolls it back
pub struct TransactionGuard<'c, DB: Database> {
    transaction: Option<Transaction<'c, DB>>,
    label: &'static str,
}

impl<'c, DB: Database> TransactionGuard<'c, DB> {
    /// Guard a transaction obtained from `pool.begin()`
    ///
    /// `label` names the unit of work in logs.
    #[must_use]
    pub fn new(transaction: Transaction<'c, DB>, label: &'static str) -> Self {
        debug!(transaction = label, "Transaction started");
        Self {
            transaction: Some(transaction),
            label,
        }
    }

    /// Commit the transaction and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was already consumed or the commit fails.
    pub async fn commit(mut self) -> AppResult<()> {
        let tx = self
            .transaction
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed - cannot commit"))?;

        tx.commit().await.map_err(|e| {
            AppError::database(format!("Transaction commit failed: {e}")).with_source(e)
        })?;
        debug!(transaction = self.label, "Transaction committed");
        Ok(())
    }

    /// Connection to run statements inside the transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was used after commit.
    pub fn executor(&mut self) -> AppResult<&mut <DB as Database>::Connection> {
        self.transaction.as_deref_mut().ok_or_else(|| {
            AppError::internal("Transaction already consumed - guard used after commit")
        })
    }
}

impl<DB: Database> Drop for TransactionGuard<'_, DB> {
    fn drop(&mut self) {
        if self.transaction.is_some() {
            // SQLx rolls back when the inner Transaction drops
            warn!(
                transaction = self.label,
                "Transaction dropped without commit - rolling back"
            );
        }
    }
}

/// `SQLite` transaction guard
pub type SqliteTransactionGuard<'c> = TransactionGuard<'c, sqlx::Sqlite>;
