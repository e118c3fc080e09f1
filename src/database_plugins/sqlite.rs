// ABOUTME: SQLite implementation of the admin data provider
// ABOUTME: Owns schema migrations, provider queries and the payout approval transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::shared::mappers::{
    parse_credit_transaction_from_row, parse_payout_from_row, parse_pending_payout_from_row,
    parse_user_from_row,
};
use super::shared::transactions::SqliteTransactionGuard;
use super::{AdminDataProvider, PayoutApproval, ProviderOrdering};
use crate::config::database::DatabaseUrl;
use crate::constants::defaults;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{
    CreditTransaction, CreditTransactionType, Payout, PayoutStatus, PendingPayout, User,
    UserRole, VerificationStatus,
};

/// Message returned when a payout cannot be approved from its current state
pub const PAYOUT_NOT_PENDING: &str = "Payout request not found or already processed";

const USER_COLUMNS: &str = "id, identity_subject, role, verification_status, credits, name, \
                            email, specialty, is_active, created_at, updated_at";

/// Primary result codes for lock contention
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

const PAYOUT_COLUMNS: &str =
    "id, user_id, credits, status, created_at, processed_at, processed_by";

/// `SQLite` database backend
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: Pool<Sqlite>,
}

impl SqliteDatabase {
    /// Connect to the database described by `database_url`
    ///
    /// In-memory databases are limited to a single pooled connection because
    /// every `SQLite` memory connection opens its own private database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not a `SQLite` URL or the connection fails.
    pub async fn connect(database_url: &DatabaseUrl) -> AppResult<Self> {
        if let DatabaseUrl::SQLite { path } = database_url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::config(format!(
                        "Failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let connection_string = database_url.to_connection_string();
        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(defaults::SQLITE_BUSY_TIMEOUT_SECS));

        let max_connections = if database_url.is_memory() { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to connect to database: {e}")).with_source(e)
            })?;

        info!(database = %database_url, max_connections, "Database pool ready");
        Ok(Self { pool })
    }

    /// Connect and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if connecting or migrating fails.
    pub async fn new(database_url: &DatabaseUrl) -> AppResult<Self> {
        let db = Self::connect(database_url).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Create tables and indexes
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails.
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                identity_subject TEXT UNIQUE NOT NULL,
                role TEXT CHECK (role IN ('ADMIN', 'LAWYER', 'CLIENT')),
                verification_status TEXT NOT NULL DEFAULT 'PENDING'
                    CHECK (verification_status IN ('PENDING', 'VERIFIED', 'REJECTED')),
                credits INTEGER NOT NULL DEFAULT 0 CHECK (credits >= 0),
                name TEXT,
                email TEXT NOT NULL,
                specialty TEXT,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS payouts (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                credits INTEGER NOT NULL CHECK (credits > 0),
                status TEXT NOT NULL DEFAULT 'PROCESSING'
                    CHECK (status IN ('PROCESSING', 'PROCESSED', 'REJECTED')),
                created_at DATETIME NOT NULL,
                processed_at DATETIME,
                processed_by TEXT REFERENCES users(id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS credit_transactions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                amount INTEGER NOT NULL,
                transaction_type TEXT NOT NULL
                    CHECK (transaction_type IN ('CREDIT_PURCHASE', 'APPOINTMENT_DEDUCTION', 'ADMIN_ADJUSTMENT')),
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_users_role_status ON users(role, verification_status)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_payouts_status ON payouts(status, created_at)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_credit_transactions_user ON credit_transactions(user_id)",
        )
        .execute(&self.pool)
        .await?;

        debug!("Database schema up to date");
        Ok(())
    }
}

#[async_trait]
impl AdminDataProvider for SqliteDatabase {
    async fn create_user(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO users (
                id, identity_subject, role, verification_status, credits,
                name, email, specialty, is_active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.identity_subject)
        .bind(user.role.map(UserRole::as_str))
        .bind(user.verification_status.as_str())
        .bind(user.credits)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.specialty)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(parse_user_from_row).transpose()
    }

    async fn get_user_by_identity_subject(&self, subject: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE identity_subject = $1"
        ))
        .bind(subject)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(parse_user_from_row).transpose()
    }

    async fn list_users_by_role_and_status(
        &self,
        role: UserRole,
        status: VerificationStatus,
        ordering: ProviderOrdering,
    ) -> AppResult<Vec<User>> {
        let order_by = match ordering {
            ProviderOrdering::NewestFirst => "created_at DESC",
            ProviderOrdering::NameAscending => "name ASC",
        };

        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE role = $1 AND verification_status = $2 \
             ORDER BY {order_by}"
        ))
        .bind(role.as_str())
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(parse_user_from_row).collect()
    }

    async fn update_verification_status(
        &self,
        lawyer_id: Uuid,
        status: VerificationStatus,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET verification_status = $1, updated_at = $2
            WHERE id = $3 AND role = 'LAWYER'
            ",
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(lawyer_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_provider_activity(&self, lawyer_id: Uuid, suspend: bool) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET verification_status = $1, is_active = $2, updated_at = $3
            WHERE id = $4 AND role = 'LAWYER'
            ",
        )
        .bind(VerificationStatus::for_suspension(suspend).as_str())
        .bind(!suspend)
        .bind(Utc::now())
        .bind(lawyer_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn create_payout(&self, payout: &Payout) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO payouts (id, user_id, credits, status, created_at, processed_at, processed_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(payout.id.to_string())
        .bind(payout.user_id.to_string())
        .bind(payout.credits)
        .bind(payout.status.as_str())
        .bind(payout.created_at)
        .bind(payout.processed_at)
        .bind(payout.processed_by.map(|id| id.to_string()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_payout(&self, payout_id: Uuid) -> AppResult<Option<Payout>> {
        let row = sqlx::query(&format!("SELECT {PAYOUT_COLUMNS} FROM payouts WHERE id = $1"))
            .bind(payout_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(parse_payout_from_row).transpose()
    }

    async fn list_payouts_with_provider(
        &self,
        status: PayoutStatus,
    ) -> AppResult<Vec<PendingPayout>> {
        let rows = sqlx::query(
            r"
            SELECT p.id, p.user_id, p.credits, p.status, p.created_at, p.processed_at, p.processed_by,
                   u.id AS lawyer_id, u.name AS lawyer_name, u.email AS lawyer_email,
                   u.specialty AS lawyer_specialty, u.credits AS lawyer_credits
            FROM payouts p
            JOIN users u ON u.id = p.user_id
            WHERE p.status = $1
            ORDER BY p.created_at DESC
            ",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(parse_pending_payout_from_row).collect()
    }

    async fn approve_payout(
        &self,
        payout_id: Uuid,
        admin_id: Uuid,
        processed_at: DateTime<Utc>,
    ) -> AppResult<PayoutApproval> {
        self.approve_payout_in_transaction(payout_id, admin_id, processed_at)
            .await
            .map_err(|e| lock_contention_as_conflict(payout_id, e))
    }

    async fn list_credit_transactions(&self, user_id: Uuid) -> AppResult<Vec<CreditTransaction>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, amount, transaction_type, created_at
            FROM credit_transactions
            WHERE user_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(parse_credit_transaction_from_row).collect()
    }
}

impl SqliteDatabase {
    /// Body of [`AdminDataProvider::approve_payout`]
    ///
    /// `BEGIN IMMEDIATE` takes the write lock up front, so a concurrent
    /// approval waits on the busy timeout and then sees the payout already
    /// processed instead of failing a read-to-write lock upgrade.
    async fn approve_payout_in_transaction(
        &self,
        payout_id: Uuid,
        admin_id: Uuid,
        processed_at: DateTime<Utc>,
    ) -> AppResult<PayoutApproval> {
        let mut guard = SqliteTransactionGuard::new(
            self.pool.begin_with("BEGIN IMMEDIATE").await?,
            "approve_payout",
        );

        let row = sqlx::query(
            r"
            SELECT p.id, p.user_id, p.credits, p.status, p.created_at, p.processed_at, p.processed_by,
                   u.id AS lawyer_id, u.name AS lawyer_name, u.email AS lawyer_email,
                   u.specialty AS lawyer_specialty, u.credits AS lawyer_credits
            FROM payouts p
            JOIN users u ON u.id = p.user_id
            WHERE p.id = $1 AND p.status = 'PROCESSING'
            ",
        )
        .bind(payout_id.to_string())
        .fetch_optional(guard.executor()?)
        .await?;

        let Some(row) = row else {
            return Err(AppError::new(ErrorCode::ResourceNotFound, PAYOUT_NOT_PENDING));
        };
        let pending = parse_pending_payout_from_row(&row)?;
        let amount = pending.payout.credits;

        if pending.lawyer.credits < amount {
            warn!(
                payout_id = %payout_id,
                requested = amount,
                available = pending.lawyer.credits,
                "Payout exceeds provider balance"
            );
            return Err(insufficient_balance(amount, pending.lawyer.credits));
        }

        // Conditional on status so a concurrent approval cannot also succeed
        let updated = sqlx::query(
            r"
            UPDATE payouts
            SET status = 'PROCESSED', processed_at = $1, processed_by = $2
            WHERE id = $3 AND status = 'PROCESSING'
            ",
        )
        .bind(processed_at)
        .bind(admin_id.to_string())
        .bind(payout_id.to_string())
        .execute(guard.executor()?)
        .await?;
        if updated.rows_affected() != 1 {
            return Err(AppError::new(ErrorCode::ResourceNotFound, PAYOUT_NOT_PENDING));
        }

        let deducted = sqlx::query(
            r"
            UPDATE users
            SET credits = credits - $1, updated_at = $2
            WHERE id = $3 AND credits >= $1
            ",
        )
        .bind(amount)
        .bind(processed_at)
        .bind(pending.lawyer.id.to_string())
        .execute(guard.executor()?)
        .await?;
        if deducted.rows_affected() != 1 {
            return Err(insufficient_balance(amount, pending.lawyer.credits));
        }

        let ledger_entry = CreditTransaction {
            id: Uuid::new_v4(),
            user_id: pending.lawyer.id,
            amount: -amount,
            transaction_type: CreditTransactionType::AdminAdjustment,
            created_at: processed_at,
        };
        sqlx::query(
            r"
            INSERT INTO credit_transactions (id, user_id, amount, transaction_type, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(ledger_entry.id.to_string())
        .bind(ledger_entry.user_id.to_string())
        .bind(ledger_entry.amount)
        .bind(ledger_entry.transaction_type.as_str())
        .bind(ledger_entry.created_at)
        .execute(guard.executor()?)
        .await?;

        guard.commit().await?;

        let payout = Payout {
            status: PayoutStatus::Processed,
            processed_at: Some(processed_at),
            processed_by: Some(admin_id),
            ..pending.payout
        };

        Ok(PayoutApproval {
            payout,
            remaining_credits: pending.lawyer.credits - amount,
            ledger_entry,
        })
    }
}

fn insufficient_balance(requested: i64, available: i64) -> AppError {
    AppError::insufficient_balance(format!(
        "Lawyer has insufficient credits for this payout (requested {requested}, available {available})"
    ))
}

/// Map lock contention that outlived the busy timeout onto `ResourceConflict`
///
/// Any other failure passes through unchanged.
fn lock_contention_as_conflict(payout_id: Uuid, e: AppError) -> AppError {
    let contended = e
        .source
        .as_deref()
        .and_then(|source| source.downcast_ref::<sqlx::Error>())
        .is_some_and(is_lock_contention);
    if !contended {
        return e;
    }
    warn!(payout_id = %payout_id, error = %e, "Payout approval lost a lock race");
    AppError::conflict(PAYOUT_NOT_PENDING).with_source(e)
}

/// `SQLITE_BUSY` or `SQLITE_LOCKED`, including their extended codes
fn is_lock_contention(error: &sqlx::Error) -> bool {
    let sqlx::Error::Database(db) = error else {
        return false;
    };
    db.code()
        .and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
}
