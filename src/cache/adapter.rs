//! Cache Adapter Module
//!
//! Typed access to versioned entries on top of a TTL'd payload store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{decode_key, encode_key, CacheEntry, CacheStore, StoreStats};
use crate::error::{OrchestratorError, Result};

/// Get/put access to versioned cache entries.
///
/// A miss is `None`, never an error. Storage failures on read are folded into
/// `None` as well; callers cannot and need not tell them apart.
#[async_trait]
pub trait CacheAdapter: Send + Sync {
    /// Returns the entry cached under `key`, if any.
    async fn get(&self, key: &str) -> Option<CacheEntry>;

    /// Caches `entry` under `key`, replacing what was there.
    async fn put(&self, key: &str, entry: &CacheEntry) -> Result<()>;

    /// Drops the entry under `key`; returns whether one was cached.
    async fn remove(&self, key: &str) -> bool;
}

// == Local Cache ==
/// [`CacheAdapter`] over the in-process [`CacheStore`].
///
/// Entries are stored as JSON with a lifetime hint; the hint is advisory and
/// enforced by the store, not here.
#[derive(Clone)]
pub struct LocalCache {
    store: Arc<RwLock<CacheStore>>,
    ttl: Duration,
}

impl LocalCache {
    /// Wraps a store; every write carries `ttl_secs` as its lifetime hint.
    pub fn new(store: CacheStore, ttl_secs: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    /// Shared handle to the underlying store, for background maintenance.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        self.store.clone()
    }

    pub async fn stats(&self) -> StoreStats {
        self.store.read().await.stats()
    }

    /// Logical keys of every live entry, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .store
            .read()
            .await
            .live_keys()
            .filter_map(decode_key)
            .map(str::to_string)
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl CacheAdapter for LocalCache {
    async fn get(&self, key: &str) -> Option<CacheEntry> {
        let storage_key = encode_key(key);
        // Reads take the write lock: an expired payload is dropped on access.
        let payload = self.store.write().await.get(&storage_key)?;

        match serde_json::from_str::<CacheEntry>(&payload) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(key, error = %e, "undecodable cache payload, treating as absent");
                None
            }
        }
    }

    async fn put(&self, key: &str, entry: &CacheEntry) -> Result<()> {
        let storage_key = encode_key(key);
        let payload = serde_json::to_string(entry)
            .map_err(|e| OrchestratorError::Internal(format!("Failed to encode entry: {e}")))?;

        self.store
            .write()
            .await
            .put(&storage_key, payload, Some(self.ttl))?;
        debug!(key, version = entry.version, "cached entry");
        Ok(())
    }

    async fn remove(&self, key: &str) -> bool {
        self.store.write().await.remove(&encode_key(key))
    }
}
