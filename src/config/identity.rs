// ABOUTME: Identity provider configuration for Firebase ID-token validation
// ABOUTME: Loads project id, enablement and key cache lifetime from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constants::defaults;

/// Firebase Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirebaseConfig {
    /// Firebase project ID (required for token validation)
    pub project_id: Option<String>,
    /// Whether Firebase authentication is enabled
    pub enabled: bool,
    /// Fallback cache TTL for Firebase public keys in seconds
    pub key_cache_ttl_secs: u64,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            enabled: false,
            key_cache_ttl_secs: defaults::FIREBASE_KEY_CACHE_TTL_SECS,
        }
    }
}

impl FirebaseConfig {
    /// Returns `true` if Firebase is enabled and has a project ID configured
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.enabled && self.project_id.is_some()
    }

    /// Load Firebase configuration from environment
    ///
    /// Environment variables:
    /// - `FIREBASE_PROJECT_ID` - Firebase project ID (required for token validation)
    /// - `FIREBASE_ENABLED` - Set to `false` to disable validation (default: true when a project id is set)
    /// - `FIREBASE_KEY_CACHE_TTL_SECS` - Public key cache TTL (default: 3600)
    #[must_use]
    pub fn from_env() -> Self {
        let project_id = env::var("FIREBASE_PROJECT_ID")
            .ok()
            .filter(|id| !id.trim().is_empty());

        let enabled = project_id.is_some()
            && env::var("FIREBASE_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true);

        if enabled {
            info!(
                project_id = project_id.as_deref().unwrap_or("(not set)"),
                "Firebase authentication enabled"
            );
        } else {
            warn!("Firebase authentication disabled - every admin request will be rejected");
        }

        Self {
            project_id,
            enabled,
            key_cache_ttl_secs: env::var("FIREBASE_KEY_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::FIREBASE_KEY_CACHE_TTL_SECS),
        }
    }
}
