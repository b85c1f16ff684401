//! Store Slot Module
//!
//! A stored payload together with its lifetime hint.

use std::time::Duration;

use tokio::time::Instant;

// == Slot ==
/// One stored payload in the [`super::CacheStore`].
///
/// Times come from `tokio::time::Instant` so a paused test clock drives expiry.
#[derive(Debug, Clone)]
pub struct Slot {
    /// Serialized payload
    pub payload: String,
    /// When the payload was written
    pub written_at: Instant,
    /// When the lifetime hint runs out
    pub expires_at: Instant,
}

impl Slot {
    /// Creates a slot that expires `ttl` after now.
    pub fn new(payload: String, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            payload,
            written_at: now,
            expires_at: now + ttl,
        }
    }

    /// An entry is expired once the current time reaches its expiry instant.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}
