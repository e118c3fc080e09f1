// ABOUTME: Admin view cache configuration
// ABOUTME: Controls how long and how many admin listings are kept in memory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::defaults;
use crate::errors::{AppError, AppResult};

/// Settings for the in-memory admin view cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewCacheConfig {
    /// Lifetime of a cached view in seconds; zero disables caching
    pub ttl_secs: u64,
    /// Maximum number of cached views
    pub capacity: usize,
}

impl Default for ViewCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: defaults::ADMIN_VIEW_CACHE_TTL_SECS,
            capacity: defaults::ADMIN_VIEW_CACHE_CAPACITY,
        }
    }
}

impl ViewCacheConfig {
    /// Load from `ADMIN_VIEW_CACHE_TTL_SECS` and `ADMIN_VIEW_CACHE_CAPACITY`
    ///
    /// # Errors
    ///
    /// Returns an error if either value is not a number or the capacity is zero.
    pub fn from_env() -> AppResult<Self> {
        let ttl_secs = match env::var("ADMIN_VIEW_CACHE_TTL_SECS") {
            Ok(raw) => raw.parse().map_err(|e| {
                AppError::config(format!("Invalid ADMIN_VIEW_CACHE_TTL_SECS value: {e}"))
            })?,
            Err(_) => defaults::ADMIN_VIEW_CACHE_TTL_SECS,
        };
        let capacity = match env::var("ADMIN_VIEW_CACHE_CAPACITY") {
            Ok(raw) => raw.parse().map_err(|e| {
                AppError::config(format!("Invalid ADMIN_VIEW_CACHE_CAPACITY value: {e}"))
            })?,
            Err(_) => defaults::ADMIN_VIEW_CACHE_CAPACITY,
        };

        let config = Self { ttl_secs, capacity };
        config.non_zero_capacity()?;
        Ok(config)
    }

    /// Entry lifetime
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Capacity as required by the LRU store
    ///
    /// # Errors
    ///
    /// Returns an error if the capacity is zero.
    pub fn non_zero_capacity(&self) -> AppResult<NonZeroUsize> {
        NonZeroUsize::new(self.capacity)
            .ok_or_else(|| AppError::config("ADMIN_VIEW_CACHE_CAPACITY must be greater than zero"))
    }
}
