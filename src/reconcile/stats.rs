//! Reconciliation counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Reconcile Stats ==
/// Process-wide outcome counters of the reconciliation engine.
#[derive(Debug, Default)]
pub struct ReconcileStats {
    requests: AtomicU64,
    verified: AtomicU64,
    stale: AtomicU64,
    skipped: AtomicU64,
    forced: AtomicU64,
    local_unavailable: AtomicU64,
    degraded: AtomicU64,
    repaired_entries: AtomicU64,
    failed_repairs: AtomicU64,
}

// == Snapshot ==
/// Point-in-time copy of [`ReconcileStats`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSnapshot {
    pub requests: u64,
    pub verified: u64,
    pub stale: u64,
    pub skipped: u64,
    pub forced: u64,
    pub local_unavailable: u64,
    pub degraded: u64,
    pub repaired_entries: u64,
    pub failed_repairs: u64,
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

impl ReconcileStats {
    pub fn record_request(&self) {
        bump(&self.requests);
    }

    pub fn record_verified(&self) {
        bump(&self.verified);
    }

    pub fn record_stale(&self) {
        bump(&self.stale);
    }

    pub fn record_skipped(&self) {
        bump(&self.skipped);
    }

    pub fn record_forced(&self) {
        bump(&self.forced);
    }

    pub fn record_local_unavailable(&self) {
        bump(&self.local_unavailable);
    }

    pub fn record_degraded(&self) {
        bump(&self.degraded);
    }

    pub fn record_repair(&self, ok: bool) {
        if ok {
            bump(&self.repaired_entries);
        } else {
            bump(&self.failed_repairs);
        }
    }

    pub fn snapshot(&self) -> ReconcileSnapshot {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        ReconcileSnapshot {
            requests: load(&self.requests),
            verified: load(&self.verified),
            stale: load(&self.stale),
            skipped: load(&self.skipped),
            forced: load(&self.forced),
            local_unavailable: load(&self.local_unavailable),
            degraded: load(&self.degraded),
            repaired_entries: load(&self.repaired_entries),
            failed_repairs: load(&self.failed_repairs),
        }
    }
}
