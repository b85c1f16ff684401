//! Version probe with fault injection.
//!
//! Reads the cached version of every key in a RW-set. A configurable share of
//! genuine hits is discarded to simulate cold-cache and capacity misses.

use std::sync::Arc;

use futures::future::join_all;
use rand::Rng;
use tracing::{debug, warn};

use crate::cache::{CacheAdapter, MISSING_VERSION};
use crate::config::ProtocolConfig;
use crate::reconcile::VersionMap;

// == Randomness ==
/// Uniform integer draws in `[0, 100]` for fault injection.
pub trait RandomSource: Send + Sync {
    fn draw(&self) -> u32;
}

/// [`RandomSource`] backed by the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn draw(&self) -> u32 {
        rand::thread_rng().gen_range(0..=100)
    }
}

// == Fault Injection ==
/// Whether a draw discards a hit under the given percentage threshold.
///
/// A zero threshold never discards; a threshold of 100 or more always does.
pub fn injects_miss(draw: u32, threshold: f64) -> bool {
    threshold > 0.0 && f64::from(draw) <= threshold
}

// == Version Probe ==
/// Resolves the locally cached version of each key.
#[derive(Clone)]
pub struct VersionProbe {
    cache: Arc<dyn CacheAdapter>,
    random: Arc<dyn RandomSource>,
}

impl VersionProbe {
    pub fn new(cache: Arc<dyn CacheAdapter>, random: Arc<dyn RandomSource>) -> Self {
        Self { cache, random }
    }

    // == Probe ==
    /// Builds the version map for `rw_set`, one entry per distinct key.
    ///
    /// # Arguments
    /// * `rw_set` - Keys to look up
    /// * `config` - Supplies the miss probabilities and the per-key cache timeout
    ///
    /// Lookups run concurrently and each is bounded by the configured cache
    /// timeout. Misses, timeouts and injected misses all report `-1`.
    pub async fn probe(&self, rw_set: &[String], config: &ProtocolConfig) -> VersionMap {
        let threshold = config.miss_threshold();
        let timeout = config.cache_timeout();

        let lookups = rw_set.iter().map(|key| async move {
            let version = match tokio::time::timeout(timeout, self.cache.get(key)).await {
                Ok(Some(entry)) => {
                    let draw = self.random.draw();
                    if injects_miss(draw, threshold) {
                        debug!(key = %key, draw, threshold, "injected miss");
                        MISSING_VERSION
                    } else {
                        entry.version
                    }
                }
                Ok(None) => MISSING_VERSION,
                Err(_) => {
                    warn!(key = %key, timeout_ms = config.cache_timeout_ms, "version lookup timed out");
                    MISSING_VERSION
                }
            };
            debug!(key = %key, version, "located version");
            (key.clone(), version)
        });

        join_all(lookups).await.into_iter().collect()
    }
}
