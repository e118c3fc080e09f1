// ABOUTME: Admin API route handlers for provider vetting and payout approval
// ABOUTME: Wires the admin service, identity resolver and view cache into an axum router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Admin routes
//!
//! Handlers are thin wrappers: they resolve the caller from the bearer
//! token, delegate to [`AdminService`], and serve listings from the view
//! cache once the caller has been authorized.

mod caller;
mod lawyers;
mod payouts;
mod types;

pub use caller::Caller;
pub use types::{LawyerListResponse, PayoutListResponse, VerifyAdminResponse};

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::cache::{AdminView, InMemoryViewCache};
use crate::database_plugins::AdminDataProvider;
use crate::errors::AppResult;
use crate::identity::IdentityResolver;
use crate::services::AdminService;

/// Admin API context shared across all endpoints
#[derive(Clone)]
pub struct AdminApiContext {
    /// Admin operations
    pub service: AdminService,
    /// Bearer token resolver
    pub identity: Arc<dyn IdentityResolver>,
    /// Cached listings, invalidated by the service after mutations
    pub view_cache: Arc<InMemoryViewCache>,
}

impl AdminApiContext {
    /// Creates a new admin API context
    ///
    /// The view cache doubles as the service's invalidator.
    pub fn new(
        database: Arc<dyn AdminDataProvider>,
        identity: Arc<dyn IdentityResolver>,
        view_cache: Arc<InMemoryViewCache>,
    ) -> Self {
        info!("AdminApiContext initialized");
        Self {
            service: AdminService::new(database, view_cache.clone()),
            identity,
            view_cache,
        }
    }
}

/// Serve `view` from the cache or compute it with `load`
///
/// The cache epoch is captured before `load` runs, so a result computed
/// across a concurrent invalidation is returned but never cached.
async fn cached_view<T, F, Fut>(
    cache: &InMemoryViewCache,
    view: AdminView,
    load: F,
) -> AppResult<T>
where
    T: Serialize + DeserializeOwned + Sync,
    F: FnOnce() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let epoch = cache.epoch().await;
    if let Some(cached) = cache.get(view).await {
        return Ok(cached);
    }

    let fresh = load().await?;
    cache.put_if_current(view, epoch, &fresh).await;
    Ok(fresh)
}

/// Admin routes implementation (Axum)
pub struct AdminRoutes;

impl AdminRoutes {
    /// Create all admin routes (Axum)
    pub fn routes(context: AdminApiContext) -> Router {
        let context = Arc::new(context);

        Router::new()
            .merge(Self::lawyer_routes(context.clone()))
            .merge(Self::payout_routes(context))
    }

    fn lawyer_routes(context: Arc<AdminApiContext>) -> Router {
        Router::new()
            .route("/admin/verify", get(lawyers::handle_verify_admin))
            .route("/admin/lawyers/pending", get(lawyers::handle_pending_lawyers))
            .route(
                "/admin/lawyers/verified",
                get(lawyers::handle_verified_lawyers),
            )
            .route(
                "/admin/lawyers/status",
                post(lawyers::handle_update_lawyer_status),
            )
            .route(
                "/admin/lawyers/active-status",
                post(lawyers::handle_update_lawyer_active_status),
            )
            .with_state(context)
    }

    fn payout_routes(context: Arc<AdminApiContext>) -> Router {
        Router::new()
            .route("/admin/payouts/pending", get(payouts::handle_pending_payouts))
            .route("/admin/payouts/approve", post(payouts::handle_approve_payout))
            .with_state(context)
    }
}
