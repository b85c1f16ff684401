//! Reconciliation engine.
//!
//! Drives one request through the speculative-read protocol: probe local
//! versions, render locally while the authority checks those versions, then
//! serve the local result or the authority's and repair the cache.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::cache::{CacheAdapter, CacheEntry};
use crate::config::ProtocolConfig;
use crate::error::{OrchestratorError, Result};
use crate::page::Renderer;
use crate::reconcile::{
    CheckRequest, ConsistencyOracle, ConsistencyVerdict, EndResult, LocalOutcome, PageArgs,
    RandomSource, ReconcileSnapshot, ReconcileStats, SpeculativeExecutor, VersionProbe,
};

// == Helpers ==
fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

// == Reconciliation Engine ==
/// Orchestrates probe, speculative execution, verification and repair.
///
/// Holds no per-request state; one engine serves every request concurrently.
pub struct ReconciliationEngine {
    cache: Arc<dyn CacheAdapter>,
    probe: VersionProbe,
    executor: SpeculativeExecutor,
    oracle: Arc<dyn ConsistencyOracle>,
    stats: ReconcileStats,
}

impl ReconciliationEngine {
    // == Constructor ==
    /// Wires the probe and executor to a shared cache.
    ///
    /// # Arguments
    /// * `cache` - Local cache read by the probe and executor, written by repair
    /// * `renderer` - Builds the local result from cached entries
    /// * `oracle` - Remote authority judging the observed versions
    /// * `random` - Draw source for fault injection
    pub fn new(
        cache: Arc<dyn CacheAdapter>,
        renderer: Arc<dyn Renderer>,
        oracle: Arc<dyn ConsistencyOracle>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            probe: VersionProbe::new(cache.clone(), random),
            executor: SpeculativeExecutor::new(cache.clone(), renderer),
            cache,
            oracle,
            stats: ReconcileStats::default(),
        }
    }

    pub fn stats(&self) -> ReconcileSnapshot {
        self.stats.snapshot()
    }

    // == Reconcile ==
    /// Answers one request whose dependencies are `rw_set`.
    ///
    /// # Arguments
    /// * `config` - Protocol settings for this request
    /// * `rw_set` - Ordered keys the request depends on
    /// * `args` - Operation arguments forwarded to the authority
    ///
    /// The version map is captured before the authority is asked and is not
    /// re-read afterwards. The authority round trip and the local render run
    /// concurrently and are both joined before a result is selected.
    ///
    /// If nothing could be rendered locally, the authority is consulted even
    /// when `config.do_consistency_check` is off.
    pub async fn reconcile(
        &self,
        config: &ProtocolConfig,
        rw_set: &[String],
        args: &PageArgs,
    ) -> Result<EndResult> {
        let started = Instant::now();
        self.stats.record_request();

        let versions = self.probe.probe(rw_set, config).await;
        debug!(?versions, elapsed_ms = elapsed_ms(started), "version probe complete");
        let request = CheckRequest::new(versions, config.backup.clone(), *args);

        let verification = async {
            if config.do_consistency_check {
                Some(self.verify(config, &request).await)
            } else {
                debug!(
                    function = %config.backup,
                    endpoint = %config.remote_url,
                    "skipping consistency check"
                );
                None
            }
        };
        let (local, verification) =
            tokio::join!(self.executor.execute(rw_set, config), verification);

        let verification = match (&local, verification) {
            (LocalOutcome::Unavailable { missing_key }, None) => {
                info!(key = %missing_key, "nothing rendered locally, forcing consistency check");
                self.stats.record_forced();
                Some(self.verify(config, &request).await)
            }
            (_, verification) => verification,
        };
        if !local.is_rendered() {
            self.stats.record_local_unavailable();
        }

        let verdict = match verification {
            None => {
                self.stats.record_skipped();
                ConsistencyVerdict::fresh()
            }
            Some(Ok(verdict)) => {
                if verdict.check_result {
                    self.stats.record_verified();
                } else {
                    self.stats.record_stale();
                }
                verdict
            }
            Some(Err(e))
                if e.is_oracle_failure()
                    && config.degrade_on_oracle_failure
                    && local.is_rendered() =>
            {
                warn!(error = %e, "consistency check failed, serving unverified local result");
                self.stats.record_degraded();
                ConsistencyVerdict::fresh()
            }
            Some(Err(e)) => {
                warn!(error = %e, "consistency check failed");
                return Err(e);
            }
        };

        let end = self.settle(verdict, local).await?;
        info!(
            success = end.success,
            keys = rw_set.len(),
            elapsed_ms = elapsed_ms(started),
            "request reconciled"
        );
        Ok(end)
    }

    // == Verify ==
    async fn verify(
        &self,
        config: &ProtocolConfig,
        request: &CheckRequest,
    ) -> Result<ConsistencyVerdict> {
        let started = Instant::now();
        let verdict = tokio::time::timeout(
            config.oracle_timeout(),
            self.oracle.verify(&config.remote_url, request),
        )
        .await
        .map_err(|_| OrchestratorError::OracleTimeout(config.oracle_timeout_ms))??;

        debug!(
            check_result = verdict.check_result,
            updated = verdict.updated_keys.as_ref().map_or(0, Vec::len),
            elapsed_ms = elapsed_ms(started),
            "consistency verdict received"
        );
        Ok(verdict)
    }

    // == Settle ==
    /// Selects the final result and repairs the cache on a stale verdict.
    async fn settle(&self, verdict: ConsistencyVerdict, local: LocalOutcome) -> Result<EndResult> {
        if verdict.check_result {
            let result = match (local, verdict.result) {
                (LocalOutcome::Rendered(result), _) => result,
                (LocalOutcome::Unavailable { .. }, Some(result)) => result,
                (LocalOutcome::Unavailable { missing_key }, None) => {
                    return Err(OrchestratorError::Unservable(format!(
                        "{missing_key} is not cached and the authority returned no result"
                    )));
                }
            };
            return Ok(EndResult {
                success: true,
                result,
            });
        }

        let result = verdict.result.ok_or_else(|| {
            OrchestratorError::OracleProtocol("stale verdict without a result".to_string())
        })?;
        let updated = verdict.updated_keys.unwrap_or_else(|| {
            warn!("stale verdict carried no updated keys");
            Vec::new()
        });
        self.repair(&updated).await;

        Ok(EndResult {
            success: false,
            result,
        })
    }

    // == Repair ==
    /// Writes authoritative entries back concurrently. A failed write is
    /// logged and counted; it does not fail the request.
    async fn repair(&self, entries: &[CacheEntry]) {
        let started = Instant::now();
        let writes = entries
            .iter()
            .map(|entry| async move { (entry, self.cache.put(&entry.key, entry).await) });

        for (entry, outcome) in join_all(writes).await {
            match outcome {
                Ok(()) => {
                    self.stats.record_repair(true);
                    debug!(id = entry.id, key = %entry.key, version = entry.version, "repaired entry");
                }
                Err(e) => {
                    self.stats.record_repair(false);
                    warn!(key = %entry.key, error = %e, "failed to repair entry");
                }
            }
        }
        debug!(
            entries = entries.len(),
            elapsed_ms = elapsed_ms(started),
            "finished repairing cache"
        );
    }
}
