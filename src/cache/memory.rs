// ABOUTME: In-memory admin view cache with LRU eviction and TTL support
// ABOUTME: Stores serialized listings per view and drops them on invalidation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{AdminView, ViewInvalidator};
use crate::config::cache::ViewCacheConfig;
use crate::errors::AppResult;

#[derive(Debug, Clone)]
struct CachedView {
    payload: Value,
    expires_at: Instant,
}

impl CachedView {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Invalidation generation observed before a view was computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewEpoch(u64);

struct ViewStore {
    entries: LruCache<AdminView, CachedView>,
    epoch: u64,
}

/// LRU cache of serialized admin views
///
/// Every invalidation advances the cache epoch. A listing computed before an
/// invalidation carries the older epoch and is refused by
/// [`InMemoryViewCache::put_if_current`], so a stale read cannot repopulate
/// the cache after a mutation committed.
///
/// A TTL of zero disables caching: nothing is stored and `get` always misses.
pub struct InMemoryViewCache {
    store: RwLock<ViewStore>,
    ttl: Duration,
}

impl InMemoryViewCache {
    /// Build a cache from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured capacity is zero.
    pub fn new(config: &ViewCacheConfig) -> AppResult<Self> {
        Ok(Self {
            store: RwLock::new(ViewStore {
                entries: LruCache::new(config.non_zero_capacity()?),
                epoch: 0,
            }),
            ttl: config.ttl(),
        })
    }

    /// Cached payload for `view`, if present and fresh
    pub async fn get<T: DeserializeOwned>(&self, view: AdminView) -> Option<T> {
        let mut store = self.store.write().await;

        // LruCache::get is mutable (updates access order)
        let payload = match store.entries.get(&view) {
            Some(entry) if entry.is_expired() => {
                store.entries.pop(&view);
                return None;
            }
            Some(entry) => entry.payload.clone(),
            None => return None,
        };
        drop(store);

        match serde_json::from_value(payload) {
            Ok(value) => {
                debug!(view = %view, "Admin view cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(view = %view, error = %e, "Discarding undecodable cached view");
                self.store.write().await.entries.pop(&view);
                None
            }
        }
    }

    /// Current invalidation epoch
    ///
    /// Capture it before reading the store for a view that will be cached.
    pub async fn epoch(&self) -> ViewEpoch {
        ViewEpoch(self.store.read().await.epoch)
    }

    /// Store `value` as `view` unless an invalidation happened since `epoch`
    ///
    /// Returns whether the value was stored.
    pub async fn put_if_current<T: Serialize + Sync>(
        &self,
        view: AdminView,
        epoch: ViewEpoch,
        value: &T,
    ) -> bool {
        if self.ttl.is_zero() {
            return false;
        }
        let payload = match serde_json::to_value(value) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(view = %view, error = %e, "Admin view not cacheable");
                return false;
            }
        };

        let mut store = self.store.write().await;
        if store.epoch != epoch.0 {
            debug!(view = %view, "Discarding view computed before an invalidation");
            return false;
        }
        store.entries.push(
            view,
            CachedView {
                payload,
                expires_at: Instant::now() + self.ttl,
            },
        );
        true
    }

    /// Number of cached views, including expired ones not yet evicted
    pub async fn len(&self) -> usize {
        self.store.read().await.entries.len()
    }

    /// Whether nothing is cached
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.entries.is_empty()
    }
}

#[async_trait]
impl ViewInvalidator for InMemoryViewCache {
    async fn invalidate(&self, view: AdminView) {
        let mut store = self.store.write().await;
        store.epoch = store.epoch.wrapping_add(1);
        let stale: Vec<AdminView> = store
            .entries
            .iter()
            .filter_map(|(cached, _)| view.covers(*cached).then_some(*cached))
            .collect();
        for cached in &stale {
            store.entries.pop(cached);
        }
        drop(store);
        debug!(view = %view, removed = stale.len(), "Admin views invalidated");
    }
}
