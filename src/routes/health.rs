// ABOUTME: Health check route handler for liveness probes
// ABOUTME: Unauthenticated endpoint reporting service name and time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::constants::{routes, service_names};

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes() -> Router {
        Router::new().route(routes::HEALTH, get(health_handler))
    }
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": service_names::COUNSELHUB_ADMIN_SERVER,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
