//! Response DTOs for the orchestrator API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::StoreStats;
use crate::reconcile::ReconcileSnapshot;

/// Response body for the writer endpoints (PUT /entries, DELETE /entries/:key)
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    /// Success message
    pub message: String,
    /// The key that was written or removed
    pub key: String,
}

impl EntryResponse {
    pub fn stored(key: impl Into<String>, version: i64) -> Self {
        let key = key.into();
        Self {
            message: format!("Stored version {} of '{}'", version, key),
            key,
        }
    }

    pub fn removed(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Removed '{}'", key),
            key,
        }
    }
}

/// Response body for GET /entries
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    pub count: usize,
    pub keys: Vec<String>,
}

impl KeysResponse {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            count: keys.len(),
            keys,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Local store counters
    pub cache: StoreStats,
    /// Store hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Reconciliation outcome counters
    pub reconcile: ReconcileSnapshot,
}

impl StatsResponse {
    pub fn new(cache: StoreStats, reconcile: ReconcileSnapshot) -> Self {
        Self {
            hit_rate: cache.hit_rate(),
            cache,
            reconcile,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
