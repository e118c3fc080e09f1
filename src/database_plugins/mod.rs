// ABOUTME: Data-access abstraction for the admin operations service
// ABOUTME: Defines the AdminDataProvider trait implemented by the SQLite backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Plugins
//!
//! The admin service talks to storage only through [`AdminDataProvider`], so
//! the relational backend can be swapped or wrapped in tests. Every method
//! maps failures onto [`AppError`](crate::errors::AppError) with
//! `ErrorCode::DatabaseError` unless documented otherwise.

/// Helpers shared by backend implementations
pub mod shared;
/// `SQLite` backend
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::{
    CreditTransaction, Payout, PayoutStatus, PendingPayout, User, UserRole, VerificationStatus,
};

pub use sqlite::SqliteDatabase;

/// Sort order for provider listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderOrdering {
    /// Most recently created first
    NewestFirst,
    /// Display name, A to Z
    NameAscending,
}

/// Effects committed by a payout approval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutApproval {
    /// Payout after the transition to `PROCESSED`
    pub payout: Payout,
    /// Provider balance after the deduction
    pub remaining_credits: i64,
    /// Ledger entry recording the deduction
    pub ledger_entry: CreditTransaction,
}

/// Storage operations required by the admin service
#[async_trait]
pub trait AdminDataProvider: Send + Sync {
    // ================================
    // Users
    // ================================

    /// Insert a provisioned user
    async fn create_user(&self, user: &User) -> AppResult<()>;

    /// Get a user by primary key
    async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>>;

    /// Get a user by identity-provider subject id
    async fn get_user_by_identity_subject(&self, subject: &str) -> AppResult<Option<User>>;

    /// List users with the given role and verification status
    async fn list_users_by_role_and_status(
        &self,
        role: UserRole,
        status: VerificationStatus,
        ordering: ProviderOrdering,
    ) -> AppResult<Vec<User>>;

    /// Set a provider's verification status
    ///
    /// Returns `false` when no provider with this id exists.
    async fn update_verification_status(
        &self,
        lawyer_id: Uuid,
        status: VerificationStatus,
    ) -> AppResult<bool>;

    /// Suspend or reactivate a provider
    ///
    /// Writes both the verification status the toggle maps onto and the
    /// explicit activity flag. Returns `false` when no provider with this id
    /// exists.
    async fn update_provider_activity(&self, lawyer_id: Uuid, suspend: bool) -> AppResult<bool>;

    // ================================
    // Payouts
    // ================================

    /// Insert a payout request
    async fn create_payout(&self, payout: &Payout) -> AppResult<()>;

    /// Get a payout by id regardless of status
    async fn get_payout(&self, payout_id: Uuid) -> AppResult<Option<Payout>>;

    /// List payouts in a status joined with the requesting provider, newest first
    async fn list_payouts_with_provider(&self, status: PayoutStatus)
        -> AppResult<Vec<PendingPayout>>;

    /// Approve a `PROCESSING` payout in a single transaction
    ///
    /// Marks the payout processed, deducts the provider's credits and appends
    /// an `ADMIN_ADJUSTMENT` ledger entry. Either all three effects commit or
    /// none do.
    ///
    /// # Errors
    ///
    /// - `ResourceNotFound` if the payout does not exist or is not `PROCESSING`
    /// - `InsufficientBalance` if the provider holds fewer credits than requested
    /// - `ResourceConflict` if a concurrent approval holds the write lock past the busy timeout
    /// - `DatabaseError` on any other storage failure
    async fn approve_payout(
        &self,
        payout_id: Uuid,
        admin_id: Uuid,
        processed_at: DateTime<Utc>,
    ) -> AppResult<PayoutApproval>;

    // ================================
    // Credit ledger
    // ================================

    /// Ledger entries for a user, oldest first
    async fn list_credit_transactions(&self, user_id: Uuid) -> AppResult<Vec<CreditTransaction>>;
}
