//! Store Statistics Module
//!
//! Counts reads, writes, expirations and capacity evictions of the local store.

use serde::Serialize;

// == Store Stats ==
/// Counters maintained by [`super::CacheStore`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    /// Reads that found a live payload
    pub hits: u64,
    /// Reads that found nothing or an expired payload
    pub misses: u64,
    /// Successful writes
    pub writes: u64,
    /// Payloads dropped because their lifetime ran out
    pub expirations: u64,
    /// Payloads dropped to make room for a new key
    pub evictions: u64,
    /// Current number of stored payloads
    pub total_entries: usize,
}

impl StoreStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// hits / (hits + misses), or 0.0 before any read.
    pub fn hit_rate(&self) -> f64 {
        let reads = self.hits + self.misses;
        if reads == 0 {
            0.0
        } else {
            self.hits as f64 / reads as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_write(&mut self) {
        self.writes += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
