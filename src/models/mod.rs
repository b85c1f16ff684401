//! Request and Response models for the orchestrator API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{PageQuery, MAX_PAGE_SIZE};
pub use responses::{EntryResponse, HealthResponse, KeysResponse, StatsResponse};
