//! API Module
//!
//! HTTP handlers and routing for the orchestrator REST API.
//!
//! # Endpoints
//! - `GET /`, `GET /posts` - Index page, verified against the authority
//! - `GET /entries`, `PUT /entries` - List and write cached entries
//! - `GET /entries/:key`, `DELETE /entries/:key` - Read and drop a cached entry
//! - `GET /stats` - Store and reconciliation statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
