//! Edge Orchestrator - speculative reads with asynchronous consistency verification
//!
//! Serves read requests from a local, possibly-stale cache while a remote
//! authority verifies the cached versions, and repairs the cache when the
//! authority disagrees.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod page;
pub mod reconcile;
pub mod tasks;

pub use api::AppState;
pub use config::{Config, ProtocolConfig};
pub use error::{OrchestratorError, Result};
pub use reconcile::ReconciliationEngine;
pub use tasks::spawn_cleanup_task;
