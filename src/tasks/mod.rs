//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Cleanup: Drops expired entries from the local store at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
