// ABOUTME: Caller identity types and the identity resolver seam
// ABOUTME: Turns bearer tokens into an identity subject consumed by the admin service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Caller identity
//!
//! The admin service never inspects request headers. HTTP handlers resolve the
//! bearer token through an [`IdentityResolver`] and pass the resulting
//! [`CallerIdentity`] into every service call.

/// Firebase ID-token resolver
pub mod firebase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;

pub use firebase::FirebaseIdentityResolver;

/// Identity of the caller as established by the identity provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// Identity-provider subject id, absent for unauthenticated callers
    pub subject: Option<String>,
}

impl CallerIdentity {
    /// Caller that presented no credentials
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { subject: None }
    }

    /// Caller authenticated as `subject`
    #[must_use]
    pub fn from_subject(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
        }
    }

    /// Subject id, if authenticated
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }
}

/// Validates a bearer token and yields the caller it identifies
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve a raw bearer token (without the `Bearer ` prefix)
    ///
    /// # Errors
    ///
    /// Returns an `Auth*` error when the token is malformed, expired or not
    /// signed by the identity provider.
    async fn resolve(&self, token: &str) -> AppResult<CallerIdentity>;
}
