// ABOUTME: Admin view keys and the cache-invalidation seam used after mutations
// ABOUTME: Pluggable invalidator with in-memory and no-op implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// In-memory admin view cache
pub mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use memory::{InMemoryViewCache, ViewEpoch};

/// Rendered admin views that may be cached
///
/// Views are addressed by path. Invalidating a view also invalidates every
/// view nested under its path, so [`AdminView::Dashboard`] covers them all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdminView {
    /// The admin dashboard root
    Dashboard,
    /// Providers awaiting verification
    PendingLawyers,
    /// Verified providers
    VerifiedLawyers,
    /// Payouts awaiting approval
    PendingPayouts,
}

impl AdminView {
    /// Path identifying this view
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/admin",
            Self::PendingLawyers => "/admin/lawyers/pending",
            Self::VerifiedLawyers => "/admin/lawyers/verified",
            Self::PendingPayouts => "/admin/payouts/pending",
        }
    }

    /// Whether invalidating `self` must also drop `other`
    #[must_use]
    pub fn covers(self, other: Self) -> bool {
        let (parent, child) = (self.path(), other.path());
        child == parent
            || child
                .strip_prefix(parent)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for AdminView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Signal that a cached admin view is stale
///
/// Called after a mutation commits. Invalidation is best effort and never
/// fails the mutation that triggered it.
#[async_trait]
pub trait ViewInvalidator: Send + Sync {
    /// Mark `view` and everything nested under it as stale
    async fn invalidate(&self, view: AdminView);
}

/// Invalidator for deployments without a view cache
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInvalidator;

#[async_trait]
impl ViewInvalidator for NoopInvalidator {
    async fn invalidate(&self, view: AdminView) {
        tracing::trace!(view = %view, "View invalidation ignored");
    }
}
