//! Cache Entry Module
//!
//! The versioned record kept in the local cache and exchanged with the authority.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version reported for a key that is absent from the cache or was dropped
/// by fault injection.
pub const MISSING_VERSION: i64 = -1;

// == Cache Entry ==
/// A logical record as stamped by the authoritative backend.
///
/// Field names on the wire are `ID`, `Key`, `Value` and `Version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    pub value: Value,
    /// Monotonically increasing, assigned by the authority
    #[serde(rename = "Version")]
    pub version: i64,
}

impl CacheEntry {
    pub fn new(id: u64, key: impl Into<String>, value: Value, version: i64) -> Self {
        Self {
            id,
            key: key.into(),
            value,
            version,
        }
    }
}
