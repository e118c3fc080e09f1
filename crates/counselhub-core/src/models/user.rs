// ABOUTME: User model with marketplace role and provider verification status
// ABOUTME: Users are keyed by their identity-provider subject and hold a credit balance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Marketplace role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Platform administrator
    Admin,
    /// Service provider (lawyer) offering paid consultations
    Lawyer,
    /// Client purchasing consultations
    Client,
}

impl UserRole {
    /// Stored representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Lawyer => "LAWYER",
            Self::Client => "CLIENT",
        }
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "LAWYER" => Ok(Self::Lawyer),
            "CLIENT" => Ok(Self::Client),
            other => Err(AppError::invalid_input(format!("Unknown user role: {other}"))),
        }
    }
}

/// Vetting state of a provider
///
/// `Pending` also covers providers an admin has suspended; see
/// [`User::is_active`] for the distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// Awaiting (or returned to) admin review
    #[default]
    Pending,
    /// Approved by an admin
    Verified,
    /// Rejected by an admin
    Rejected,
}

impl VerificationStatus {
    /// Stored representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Verified => "VERIFIED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Status an admin maps the suspend toggle onto
    #[must_use]
    pub const fn for_suspension(suspend: bool) -> Self {
        if suspend {
            Self::Pending
        } else {
            Self::Verified
        }
    }
}

impl Display for VerificationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "VERIFIED" => Ok(Self::Verified),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(AppError::invalid_input(format!(
                "Unknown verification status: {other}"
            ))),
        }
    }
}

/// A marketplace user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Subject id issued by the identity provider
    pub identity_subject: String,
    /// Role, unset until onboarding completes
    pub role: Option<UserRole>,
    /// Provider vetting state
    pub verification_status: VerificationStatus,
    /// Credit balance, never negative
    pub credits: i64,
    /// Display name
    pub name: Option<String>,
    /// Email address
    pub email: String,
    /// Practice area for providers
    pub specialty: Option<String>,
    /// Cleared while an admin has the provider suspended
    pub is_active: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new user record for provisioning
    #[must_use]
    pub fn new(identity_subject: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            identity_subject: identity_subject.into(),
            role: None,
            verification_status: VerificationStatus::Pending,
            credits: 0,
            name: None,
            email: email.into(),
            specialty: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this user holds the admin role
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Some(UserRole::Admin)
    }
}

/// Provider fields shown next to a payout request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderSummary {
    /// Provider user id
    pub id: Uuid,
    /// Display name
    pub name: Option<String>,
    /// Email address
    pub email: String,
    /// Practice area
    pub specialty: Option<String>,
    /// Current credit balance
    pub credits: i64,
}
