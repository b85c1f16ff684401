//! Cache Store Module
//!
//! In-memory TTL'd key-value store backing the local cache.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{Slot, StoreStats, MAX_STORAGE_KEY_LENGTH, MAX_PAYLOAD_SIZE};
use crate::error::{OrchestratorError, Result};

// == Cache Store ==
/// Bounded payload store with per-entry lifetime hints.
///
/// When full, writing a new key evicts the payload closest to expiry.
#[derive(Debug)]
pub struct CacheStore {
    slots: HashMap<String, Slot>,
    stats: StoreStats,
    max_entries: usize,
    default_ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` payloads.
    ///
    /// # Arguments
    /// * `max_entries` - Capacity of the store
    /// * `default_ttl_secs` - Lifetime hint used when a write carries none
    pub fn new(max_entries: usize, default_ttl_secs: u64) -> Self {
        Self {
            slots: HashMap::new(),
            stats: StoreStats::new(),
            max_entries,
            default_ttl: Duration::from_secs(default_ttl_secs),
        }
    }

    // == Put ==
    /// Stores a payload, replacing any previous payload for the key.
    pub fn put(&mut self, key: &str, payload: String, ttl: Option<Duration>) -> Result<()> {
        if key.is_empty() || key.len() > MAX_STORAGE_KEY_LENGTH {
            return Err(OrchestratorError::InvalidRequest(format!(
                "Storage key must be 1..={} bytes",
                MAX_STORAGE_KEY_LENGTH
            )));
        }
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(OrchestratorError::InvalidRequest(format!(
                "Payload exceeds maximum size of {} bytes",
                MAX_PAYLOAD_SIZE
            )));
        }
        if self.max_entries == 0 {
            return Err(OrchestratorError::Internal(
                "Store has zero capacity".to_string(),
            ));
        }

        if !self.slots.contains_key(key) && self.slots.len() >= self.max_entries {
            self.evict_one();
        }

        let slot = Slot::new(payload, ttl.unwrap_or(self.default_ttl));
        self.slots.insert(key.to_string(), slot);
        self.stats.record_write();
        self.stats.set_total_entries(self.slots.len());
        Ok(())
    }

    // == Get ==
    /// Returns the live payload for a key.
    ///
    /// An expired payload is dropped and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<String> {
        match self.slots.get(key) {
            Some(slot) if !slot.is_expired() => {
                let payload = slot.payload.clone();
                self.stats.record_hit();
                Some(payload)
            }
            Some(_) => {
                self.slots.remove(key);
                self.stats.record_expirations(1);
                self.stats.record_miss();
                self.stats.set_total_entries(self.slots.len());
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Drops a payload; returns whether one was stored.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.slots.remove(key).is_some();
        self.stats.set_total_entries(self.slots.len());
        removed
    }

    // == Cleanup Expired ==
    /// Drops every expired payload and returns how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, slot| !slot.is_expired());
        let removed = before - self.slots.len();

        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.slots.len());
        removed
    }

    pub fn stats(&self) -> StoreStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.slots.len());
        stats
    }

    /// Storage keys whose payload has not expired.
    pub fn live_keys(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .filter(|(_, slot)| !slot.is_expired())
            .map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn evict_one(&mut self) {
        let victim = self
            .slots
            .iter()
            .min_by_key(|(_, slot)| (slot.expires_at, slot.written_at))
            .map(|(key, _)| key.clone());

        if let Some(key) = victim {
            self.slots.remove(&key);
            self.stats.record_eviction();
        }
    }
}
