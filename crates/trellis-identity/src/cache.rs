//! Opt-in TTL cache for fetched identity-server public keys.
//!
//! Disabled by default (`key_cache_ttl_secs = 0`): the baseline trusts no key
//! that wasn't fetched within the current verification, since the upstream
//! protocol defines no revocation semantics. Enabling the cache trades that
//! guarantee for fewer round trips.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug)]
struct CacheEntry {
    raw: Vec<u8>,
    fetched_at: Instant,
}

/// In-memory `(server, key_id)` → raw-key cache with a fixed TTL.
///
/// Thread-safe, suitable for sharing across concurrent resolutions via `Arc`.
#[derive(Debug, Clone)]
pub struct KeyCache {
    inner: Arc<RwLock<HashMap<(String, String), CacheEntry>>>,
    ttl: Duration,
}

impl KeyCache {
    pub fn new(ttl: Duration) -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())), ttl }
    }

    /// Return the cached key bytes if present and within TTL.
    pub async fn get(&self, server: &str, key_id: &str) -> Option<Vec<u8>> {
        let cache = self.inner.read().await;
        let entry = cache.get(&(server.to_owned(), key_id.to_owned()))?;
        if entry.fetched_at.elapsed() < self.ttl {
            debug!("Key cache hit: {} {}", server, key_id);
            return Some(entry.raw.clone());
        }
        None
    }

    pub async fn insert(&self, server: &str, key_id: &str, raw: Vec<u8>) {
        let mut cache = self.inner.write().await;
        cache.insert(
            (server.to_owned(), key_id.to_owned()),
            CacheEntry { raw, fetched_at: Instant::now() },
        );
    }

    /// Drop all cached keys for a server (e.g. after a verification failure).
    pub async fn invalidate(&self, server: &str) {
        self.inner.write().await.retain(|(s, _), _| s != server);
    }
}
