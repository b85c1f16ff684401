//! Reconciliation Module
//!
//! The speculative-read protocol: a version probe, a speculative executor and
//! a consistency oracle client, orchestrated by the reconciliation engine.

mod engine;
mod executor;
mod oracle;
mod probe;
mod stats;
mod types;

pub use engine::ReconciliationEngine;
pub use executor::SpeculativeExecutor;
pub use oracle::{ConsistencyOracle, HttpOracle};
pub use probe::{injects_miss, RandomSource, ThreadRandom, VersionProbe};
pub use stats::{ReconcileSnapshot, ReconcileStats};
pub use types::{
    CheckRequest, ConsistencyVerdict, EndResult, LocalOutcome, PageArgs, RwSet, VersionMap,
    DEFAULT_PAGE_NUM, DEFAULT_PAGE_SIZE,
};
