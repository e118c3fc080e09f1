// ABOUTME: Admin operations service for provider vetting and payout approval
// ABOUTME: Gates every operation on the caller's ADMIN role and signals view invalidation after writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Admin operations
//!
//! [`AdminService`] composes three injected dependencies: the data provider,
//! a view invalidator and, through the caller identity passed to each call,
//! the identity provider. Authorization and input validation always happen
//! before the store is touched.

/// Mutation form inputs
pub mod forms;

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::cache::{AdminView, ViewInvalidator};
use crate::database_plugins::{AdminDataProvider, PayoutApproval, ProviderOrdering};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::identity::CallerIdentity;
use crate::models::{PayoutStatus, PendingPayout, User, UserRole, VerificationStatus};

pub use forms::{ApprovePayoutForm, UpdateLawyerActiveStatusForm, UpdateLawyerStatusForm};

/// Result payload of a successful mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationOutcome {
    /// Always `true`; failures are reported as errors
    pub success: bool,
}

impl MutationOutcome {
    const SUCCESS: Self = Self { success: true };
}

/// An admin caller that passed the privilege check
///
/// Only [`AdminService::authorize`] constructs one, so holding a session is
/// proof the role check already ran.
#[derive(Debug, Clone)]
pub struct AdminSession {
    admin: User,
}

impl AdminSession {
    /// The admin's user record
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.admin
    }
}

/// Admin operations over the marketplace store
#[derive(Clone)]
pub struct AdminService {
    database: Arc<dyn AdminDataProvider>,
    invalidator: Arc<dyn ViewInvalidator>,
}

impl AdminService {
    /// Create a service over a data provider and view invalidator
    #[must_use]
    pub fn new(database: Arc<dyn AdminDataProvider>, invalidator: Arc<dyn ViewInvalidator>) -> Self {
        Self {
            database,
            invalidator,
        }
    }

    /// Whether the caller is an admin
    ///
    /// Never fails: a missing identity, unknown user or lookup error all
    /// count as "not an admin".
    pub async fn verify_admin(&self, caller: &CallerIdentity) -> bool {
        self.resolve_admin(caller).await.is_some()
    }

    /// Check the caller's role once and open an admin session
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` if the caller is not an admin.
    pub async fn authorize(&self, caller: &CallerIdentity) -> AppResult<AdminSession> {
        self.resolve_admin(caller)
            .await
            .map(|admin| AdminSession { admin })
            .ok_or_else(|| {
                debug!(subject = caller.subject().unwrap_or("(anonymous)"), "Admin access denied");
                AppError::unauthorized()
            })
    }

    async fn resolve_admin(&self, caller: &CallerIdentity) -> Option<User> {
        let subject = caller.subject()?;
        match self.database.get_user_by_identity_subject(subject).await {
            Ok(Some(user)) if user.is_admin() => Some(user),
            Ok(_) => None,
            Err(e) => {
                warn!(subject = %subject, error = %e, "Admin privilege lookup failed");
                None
            }
        }
    }

    /// Providers awaiting verification, newest first
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for non-admins or a database error.
    pub async fn get_pending_lawyers(&self, caller: &CallerIdentity) -> AppResult<Vec<User>> {
        let session = self.authorize(caller).await?;
        self.pending_lawyers(&session).await
    }

    /// Providers awaiting verification for an already authorized admin
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn pending_lawyers(&self, _session: &AdminSession) -> AppResult<Vec<User>> {
        self.database
            .list_users_by_role_and_status(
                UserRole::Lawyer,
                VerificationStatus::Pending,
                ProviderOrdering::NewestFirst,
            )
            .await
            .map_err(|e| store_failure("Failed to fetch pending lawyers", e))
    }

    /// Verified providers by name
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for non-admins or a database error.
    pub async fn get_verified_lawyers(&self, caller: &CallerIdentity) -> AppResult<Vec<User>> {
        let session = self.authorize(caller).await?;
        self.verified_lawyers(&session).await
    }

    /// Verified providers for an already authorized admin
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn verified_lawyers(&self, _session: &AdminSession) -> AppResult<Vec<User>> {
        self.database
            .list_users_by_role_and_status(
                UserRole::Lawyer,
                VerificationStatus::Verified,
                ProviderOrdering::NameAscending,
            )
            .await
            .map_err(|e| store_failure("Failed to fetch verified lawyers", e))
    }

    /// Approve or reject a provider's verification
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, a validation error, `ResourceNotFound` for an
    /// unknown provider, or a database error.
    pub async fn update_lawyer_status(
        &self,
        caller: &CallerIdentity,
        form: &UpdateLawyerStatusForm,
    ) -> AppResult<MutationOutcome> {
        let session = self.authorize(caller).await?;
        let admin = session.user();
        let (lawyer_id, status) = form.validate()?;

        let updated = self
            .database
            .update_verification_status(lawyer_id, status)
            .await
            .map_err(|e| store_failure("Failed to update lawyer status", e))?;
        if !updated {
            return Err(AppError::not_found("Lawyer"));
        }

        info!(admin_id = %admin.id, lawyer_id = %lawyer_id, status = %status, "Lawyer status updated");
        self.invalidator.invalidate(AdminView::Dashboard).await;
        Ok(MutationOutcome::SUCCESS)
    }

    /// Suspend or reactivate a provider
    ///
    /// Suspension returns the provider to `PENDING`; reactivation marks them
    /// `VERIFIED`. The activity flag is written alongside.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, a validation error, `ResourceNotFound` for an
    /// unknown provider, or a database error.
    pub async fn update_lawyer_active_status(
        &self,
        caller: &CallerIdentity,
        form: &UpdateLawyerActiveStatusForm,
    ) -> AppResult<MutationOutcome> {
        let session = self.authorize(caller).await?;
        let admin = session.user();
        let (lawyer_id, suspend) = form.validate()?;

        let updated = self
            .database
            .update_provider_activity(lawyer_id, suspend)
            .await
            .map_err(|e| store_failure("Failed to update lawyer active status", e))?;
        if !updated {
            return Err(AppError::not_found("Lawyer"));
        }

        info!(admin_id = %admin.id, lawyer_id = %lawyer_id, suspend, "Lawyer active status updated");
        self.invalidator.invalidate(AdminView::Dashboard).await;
        Ok(MutationOutcome::SUCCESS)
    }

    /// Payouts awaiting approval with their providers, newest first
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for non-admins or a database error.
    pub async fn get_pending_payouts(
        &self,
        caller: &CallerIdentity,
    ) -> AppResult<Vec<PendingPayout>> {
        let session = self.authorize(caller).await?;
        self.pending_payouts(&session).await
    }

    /// Payouts awaiting approval for an already authorized admin
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn pending_payouts(&self, _session: &AdminSession) -> AppResult<Vec<PendingPayout>> {
        self.database
            .list_payouts_with_provider(PayoutStatus::Processing)
            .await
            .map_err(|e| store_failure("Failed to fetch pending payouts", e))
    }

    /// Approve a payout, deducting the provider's credits
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, a validation error, `ResourceNotFound` when
    /// the payout is absent or already processed, `ResourceConflict` when a
    /// concurrent approval holds the store past its busy timeout,
    /// `InsufficientBalance`, or a database error. Nothing is written unless
    /// the whole approval commits.
    pub async fn approve_payout(
        &self,
        caller: &CallerIdentity,
        form: &ApprovePayoutForm,
    ) -> AppResult<MutationOutcome> {
        let session = self.authorize(caller).await?;
        let admin = session.user();
        let payout_id = form.validate()?;

        let approval: PayoutApproval = self
            .database
            .approve_payout(payout_id, admin.id, Utc::now())
            .await
            .map_err(|e| match e.code {
                ErrorCode::ResourceNotFound
                | ErrorCode::ResourceConflict
                | ErrorCode::InsufficientBalance => e,
                _ => store_failure("Failed to approve payout", e),
            })?;

        info!(
            admin_id = %admin.id,
            payout_id = %payout_id,
            lawyer_id = %approval.ledger_entry.user_id,
            credits = approval.payout.credits,
            remaining_credits = approval.remaining_credits,
            "Payout approved"
        );
        self.invalidator.invalidate(AdminView::Dashboard).await;
        Ok(MutationOutcome::SUCCESS)
    }
}

fn store_failure(context: &str, e: AppError) -> AppError {
    error!(error = %e, "{context}");
    AppError::database(format!("{context}: {}", e.message)).with_source(e)
}
