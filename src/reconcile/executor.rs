//! Speculative local execution.

use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join_all;
use tracing::debug;

use crate::cache::CacheAdapter;
use crate::config::ProtocolConfig;
use crate::page::Renderer;
use crate::reconcile::LocalOutcome;

// == Speculative Executor ==
/// Renders a result from cached entries alone.
///
/// Fails closed: if any dependency is absent nothing is rendered. Never
/// contacts the authority and never writes the cache.
#[derive(Clone)]
pub struct SpeculativeExecutor {
    cache: Arc<dyn CacheAdapter>,
    renderer: Arc<dyn Renderer>,
}

impl SpeculativeExecutor {
    pub fn new(cache: Arc<dyn CacheAdapter>, renderer: Arc<dyn Renderer>) -> Self {
        Self { cache, renderer }
    }

    // == Execute ==
    /// Renders from the entries of `rw_set`, in order.
    ///
    /// # Arguments
    /// * `rw_set` - Ordered keys the result depends on
    /// * `config` - Supplies the per-key cache timeout; a timed-out read is a miss
    pub async fn execute(&self, rw_set: &[String], config: &ProtocolConfig) -> LocalOutcome {
        let timeout = config.cache_timeout();

        let fetches = rw_set.iter().map(|key| async move {
            match tokio::time::timeout(timeout, self.cache.get(key)).await {
                Ok(Some(entry)) => Ok(entry),
                Ok(None) | Err(_) => Err(key.clone()),
            }
        });

        // try_join_all drops the remaining fetches on the first miss.
        let entries = match try_join_all(fetches).await {
            Ok(entries) => entries,
            Err(missing_key) => {
                debug!(key = %missing_key, "cannot render locally, dependency not cached");
                return LocalOutcome::Unavailable { missing_key };
            }
        };

        let started = Instant::now();
        let rendered = self.renderer.render(&entries);
        debug!(
            entries = entries.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rendered speculative result"
        );
        LocalOutcome::Rendered(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheEntry, CacheStore, LocalCache};
    use crate::page::IndexRenderer;
    use async_trait::async_trait;
    use serde_json::json;
    use std::time::Duration;

    async fn seeded_cache(keys: &[&str]) -> Arc<LocalCache> {
        let cache = LocalCache::new(CacheStore::new(100, 60), 60);
        for (i, key) in keys.iter().enumerate() {
            let entry = CacheEntry::new(i as u64 + 1, *key, json!({"title": key}), 1);
            cache.put(key, &entry).await.unwrap();
        }
        Arc::new(cache)
    }

    fn keys(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    /// Never answers a read.
    struct StalledCache;

    #[async_trait]
    impl CacheAdapter for StalledCache {
        async fn get(&self, _key: &str) -> Option<CacheEntry> {
            std::future::pending().await
        }

        async fn put(&self, _key: &str, _entry: &CacheEntry) -> crate::error::Result<()> {
            Ok(())
        }

        async fn remove(&self, _key: &str) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_renders_entries_in_rw_set_order() {
        let cache = seeded_cache(&["post:1", "post:2"]).await;
        let executor = SpeculativeExecutor::new(cache, Arc::new(IndexRenderer));

        let outcome = executor
            .execute(&keys(&["post:2", "post:1"]), &ProtocolConfig::default())
            .await;

        let LocalOutcome::Rendered(page) = outcome else {
            panic!("expected a rendered page");
        };
        assert_eq!(page["count"], 2);
        assert_eq!(page["posts"][0]["key"], "post:2");
        assert_eq!(page["posts"][1]["key"], "post:1");
    }

    #[tokio::test]
    async fn test_missing_dependency_is_unavailable() {
        let cache = seeded_cache(&["post:1"]).await;
        let executor = SpeculativeExecutor::new(cache, Arc::new(IndexRenderer));

        let outcome = executor
            .execute(&keys(&["post:1", "post:9"]), &ProtocolConfig::default())
            .await;

        assert_eq!(
            outcome,
            LocalOutcome::Unavailable {
                missing_key: "post:9".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_rw_set_renders_empty_page() {
        let cache = seeded_cache(&[]).await;
        let executor = SpeculativeExecutor::new(cache, Arc::new(IndexRenderer));

        let outcome = executor.execute(&[], &ProtocolConfig::default()).await;

        assert_eq!(outcome, LocalOutcome::Rendered(json!({"count": 0, "posts": []})));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_read_counts_as_missing() {
        let executor = SpeculativeExecutor::new(Arc::new(StalledCache), Arc::new(IndexRenderer));
        let config = ProtocolConfig {
            cache_timeout_ms: 50,
            ..ProtocolConfig::default()
        };

        let started = tokio::time::Instant::now();
        let outcome = executor.execute(&keys(&["post:1"]), &config).await;

        assert!(!outcome.is_rendered());
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
