//! TTL Cleanup Task
//!
//! Background task that periodically drops expired entries from the local store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that drops expired payloads every
/// `cleanup_interval_secs` seconds.
///
/// Expired payloads already read as absent; this only reclaims their memory.
/// The returned handle is aborted on shutdown.
pub fn spawn_cleanup_task(
    store: Arc<RwLock<CacheStore>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let period = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(interval_secs = period.as_secs(), "starting TTL cleanup task");

        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = store.write().await.cleanup_expired();
            if removed > 0 {
                info!(removed, "TTL cleanup dropped expired entries");
            } else {
                debug!("TTL cleanup found no expired entries");
            }
        }
    })
}
