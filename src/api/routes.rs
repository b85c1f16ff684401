//! API Routes
//!
//! Configures the Axum router with all orchestrator endpoints.

use axum::{
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_entry_handler, get_entry_handler, health_handler, index_handler,
    list_entries_handler, put_entry_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /`, `GET /posts` - Index page through the reconciliation protocol
/// - `GET /entries` - List cached keys
/// - `PUT /entries` - Cache an entry (out-of-band writer)
/// - `GET /entries/:key` - Read a cached entry
/// - `DELETE /entries/:key` - Drop a cached entry
/// - `GET /stats` - Store and reconciliation statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/posts", get(index_handler))
        .route("/entries", get(list_entries_handler).put(put_entry_handler))
        .route(
            "/entries/:key",
            get(get_entry_handler).delete(delete_entry_handler),
        )
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
