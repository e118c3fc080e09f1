// ABOUTME: Route module organization for the Counselhub admin HTTP API
// ABOUTME: Assembles admin and health routes behind the shared HTTP middleware stack
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the admin server

/// Admin API routes
pub mod admin;
/// Health check route
pub mod health;

pub use admin::{AdminApiContext, AdminRoutes};
pub use health::HealthRoutes;

use std::time::Duration;

use axum::Router;

use crate::middleware::apply_http_layers;

/// Complete application router
pub fn build_router(context: AdminApiContext, request_timeout: Duration) -> Router {
    let router = Router::new()
        .merge(HealthRoutes::routes())
        .merge(AdminRoutes::routes(context));

    apply_http_layers(router, request_timeout)
}
