//! API Handlers
//!
//! HTTP request handlers for each orchestrator endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::cache::{CacheAdapter, CacheEntry, CacheStore, LocalCache};
use crate::config::{Config, ProtocolConfig};
use crate::error::{OrchestratorError, Result};
use crate::models::{EntryResponse, HealthResponse, KeysResponse, PageQuery, StatsResponse};
use crate::page::{IndexRenderer, PageResolver, Resolver};
use crate::reconcile::{ConsistencyOracle, HttpOracle, ReconciliationEngine, ThreadRandom};

/// Response header reporting whether the served result was verified fresh.
pub const CONSISTENCY_HEADER: &str = "x-consistency-check";

/// Application state shared across all handlers.
///
/// Protocol settings live here and are handed to the engine on every request.
#[derive(Clone)]
pub struct AppState {
    /// Local cache of versioned entries
    pub cache: LocalCache,
    /// Reconciliation engine reading and repairing `cache`
    pub engine: Arc<ReconciliationEngine>,
    /// Maps page arguments to the keys a page reads
    pub resolver: Arc<dyn Resolver>,
    /// Reconciliation settings
    pub protocol: Arc<ProtocolConfig>,
}

impl AppState {
    /// Creates state with the index page collaborators and thread-local randomness.
    pub fn new(
        cache: LocalCache,
        oracle: Arc<dyn ConsistencyOracle>,
        protocol: ProtocolConfig,
    ) -> Self {
        let engine = ReconciliationEngine::new(
            Arc::new(cache.clone()),
            Arc::new(IndexRenderer),
            oracle,
            Arc::new(ThreadRandom),
        );
        Self::from_parts(cache, engine, Arc::new(PageResolver::default()), protocol)
    }

    /// Creates state from an already assembled engine.
    pub fn from_parts(
        cache: LocalCache,
        engine: ReconciliationEngine,
        resolver: Arc<dyn Resolver>,
        protocol: ProtocolConfig,
    ) -> Self {
        Self {
            cache,
            engine: Arc::new(engine),
            resolver,
            protocol: Arc::new(protocol),
        }
    }

    /// Creates state from configuration, talking to the authority over HTTP.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = LocalCache::new(
            CacheStore::new(config.max_entries, config.cache_ttl),
            config.cache_ttl,
        );
        let oracle = HttpOracle::new(config.protocol.oracle_timeout())?;
        Ok(Self::new(cache, Arc::new(oracle), config.protocol.clone()))
    }
}

/// Handler for GET / and GET /posts
///
/// Serves the index page through the reconciliation protocol. The body is the
/// final result; `x-consistency-check` reports `passed` or `failed`.
pub async fn index_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    if let Some(error_msg) = query.validate() {
        return Err(OrchestratorError::InvalidRequest(error_msg));
    }

    let args = query.to_args();
    let rw_set = state.resolver.resolve(&args);
    debug!(?args, keys = rw_set.len(), "resolved read set");

    let end = state.engine.reconcile(&state.protocol, &rw_set, &args).await?;

    let body = serde_json::to_vec(&end.result)
        .map_err(|e| OrchestratorError::Internal(format!("Failed to encode result: {e}")))?;
    let verdict = if end.success { "passed" } else { "failed" };
    let headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json;charset=UTF-8"),
        ),
        (
            HeaderName::from_static(CONSISTENCY_HEADER),
            HeaderValue::from_static(verdict),
        ),
    ];

    Ok((headers, body).into_response())
}

/// Handler for PUT /entries
///
/// Out-of-band writer: caches an entry as supplied.
pub async fn put_entry_handler(
    State(state): State<AppState>,
    Json(entry): Json<CacheEntry>,
) -> Result<Json<EntryResponse>> {
    if entry.key.is_empty() {
        return Err(OrchestratorError::InvalidRequest(
            "Key cannot be empty".to_string(),
        ));
    }
    if entry.version < 0 {
        return Err(OrchestratorError::InvalidRequest(
            "Version cannot be negative".to_string(),
        ));
    }

    state.cache.put(&entry.key, &entry).await?;

    Ok(Json(EntryResponse::stored(entry.key, entry.version)))
}

/// Handler for GET /entries/:key
pub async fn get_entry_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<CacheEntry>> {
    state
        .cache
        .get(&key)
        .await
        .map(Json)
        .ok_or(OrchestratorError::NotFound(key))
}

/// Handler for DELETE /entries/:key
pub async fn delete_entry_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryResponse>> {
    if !state.cache.remove(&key).await {
        return Err(OrchestratorError::NotFound(key));
    }

    Ok(Json(EntryResponse::removed(key)))
}

/// Handler for GET /entries
pub async fn list_entries_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    Json(KeysResponse::new(state.cache.keys().await))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.stats().await;
    Json(StatsResponse::new(cache, state.engine.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
