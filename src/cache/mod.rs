//! Cache Module
//!
//! Local, possibly-stale cache of versioned entries: a TTL'd payload store
//! and the typed adapter the reconciliation protocol reads and repairs through.

mod adapter;
mod keys;
mod record;
mod slot;
mod stats;
mod store;


// Re-export public types
pub use adapter::{CacheAdapter, LocalCache};
pub use keys::{decode_key, encode_key};
pub use record::{CacheEntry, MISSING_VERSION};
pub use slot::Slot;
pub use stats::StoreStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed storage key length in bytes
pub const MAX_STORAGE_KEY_LENGTH: usize = 512;

/// Maximum allowed serialized entry size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 1024 * 1024; // 1 MB
