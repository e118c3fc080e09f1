// ABOUTME: Environment-based server configuration
// ABOUTME: Assembles HTTP, database, identity and cache settings and renders a log-safe summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::cache::ViewCacheConfig;
use super::database::DatabaseConfig;
use super::identity::FirebaseConfig;
use crate::constants::defaults;
use crate::errors::{AppError, AppResult};

/// Server configuration loaded from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Identity provider configuration
    pub firebase: FirebaseConfig,
    /// Admin view cache configuration
    pub view_cache: ViewCacheConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: defaults::HTTP_PORT,
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
            database: DatabaseConfig::default(),
            firebase: FirebaseConfig::default(),
            view_cache: ViewCacheConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but malformed.
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: parse_env_or("HTTP_PORT", defaults::HTTP_PORT)?,
            request_timeout_secs: parse_env_or(
                "REQUEST_TIMEOUT_SECS",
                defaults::REQUEST_TIMEOUT_SECS,
            )?,
            database: DatabaseConfig::from_env()?,
            firebase: FirebaseConfig::from_env(),
            view_cache: ViewCacheConfig::from_env()?,
        };

        if config.request_timeout_secs == 0 {
            return Err(AppError::config("REQUEST_TIMEOUT_SECS must be greater than zero"));
        }

        Ok(config)
    }

    /// Request timeout applied by the HTTP layer
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Summary suitable for startup logs; contains no secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Counselhub Admin Server Configuration:\n\
             - HTTP Port: {}\n\
             - Database: {}\n\
             - Auto Migrate: {}\n\
             - Request Timeout: {}s\n\
             - Firebase Auth: {}\n\
             - Admin View Cache: {}",
            self.http_port,
            if self.database.url.is_memory() {
                "SQLite (in-memory)"
            } else {
                "SQLite"
            },
            self.database.auto_migrate,
            self.request_timeout_secs,
            if self.firebase.is_configured() {
                "Enabled"
            } else {
                "Disabled"
            },
            if self.view_cache.ttl_secs == 0 {
                "Disabled".to_owned()
            } else {
                format!(
                    "{} views, {}s TTL",
                    self.view_cache.capacity, self.view_cache.ttl_secs
                )
            },
        )
    }
}

fn parse_env_or<T>(key: &str, default: T) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value: {e}"))),
        Err(_) => Ok(default),
    }
}
