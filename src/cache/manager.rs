//! Cache manager for raw API response bodies
//!
//! Provides a `ResponseCache` that stores response bytes keyed by request URL,
//! together with the instant they were stored. Freshness is checked on every
//! read, so an expired entry is never returned even before the reaper runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use super::reaper::ReaperHandle;

/// A single cached response body
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Raw response body
    value: Vec<u8>,
    /// When the entry was stored
    created_at: Instant,
}

impl CacheEntry {
    fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }
}

/// Entry map shared between the cache handle and its reaper task
#[derive(Debug)]
pub(super) struct Store {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Store {
    fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Locks the entry map, recovering the guard if a previous holder panicked
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes every entry older than the TTL and returns how many were dropped
    pub(super) fn reap(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.age(now) <= self.ttl);
        before - entries.len()
    }
}

/// Thread-safe, time-bounded cache of response bodies
///
/// Constructing a `ResponseCache` spawns a reaper on the current tokio runtime
/// that sweeps expired entries every `ttl`. Dropping the cache (or calling
/// [`ResponseCache::shutdown`]) stops the reaper.
#[derive(Debug)]
pub struct ResponseCache {
    store: Arc<Store>,
    reaper: ReaperHandle,
}

impl ResponseCache {
    /// Creates an empty cache and starts its reaper
    ///
    /// # Panics
    /// Panics if called outside of a tokio runtime, since the reaper is a tokio task.
    pub fn new(ttl: Duration) -> Self {
        Self::with_reap_interval(ttl, ttl)
    }

    /// Creates an empty cache whose reaper sweeps every `reap_interval` instead of every `ttl`
    ///
    /// # Panics
    /// Panics if called outside of a tokio runtime.
    pub fn with_reap_interval(ttl: Duration, reap_interval: Duration) -> Self {
        let store = Arc::new(Store::new(ttl));
        let reaper = ReaperHandle::spawn(Arc::clone(&store), reap_interval);
        Self { store, reaper }
    }

    /// The configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.store.ttl
    }

    /// Stores `value` under `key`, replacing any previous entry and resetting its age
    pub fn add(&self, key: impl Into<String>, value: Vec<u8>) {
        let key = key.into();
        let entry = CacheEntry {
            value,
            created_at: Instant::now(),
        };
        debug!(key = %key, bytes = entry.value.len(), "cache store");
        self.store.lock().insert(key, entry);
    }

    /// Returns a copy of the value for `key` if it exists and is younger than the TTL
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let now = Instant::now();
        let entries = self.store.lock();
        let entry = entries.get(key)?;
        if entry.age(now) < self.store.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Runs one reap pass immediately, returning the number of entries removed
    pub fn reap(&self) -> usize {
        self.store.reap()
    }

    /// Number of entries physically held, including expired ones not yet reaped
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stops the reaper and waits for it to exit
    pub async fn shutdown(self) {
        self.reaper.shutdown().await;
    }
}
