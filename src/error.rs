//! Error types for the orchestrator
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Orchestrator Error Enum ==
/// Unified error type for the orchestrator.
///
/// Cache misses and stale verdicts are not errors; they are normal inputs
/// to the reconciliation protocol and never surface here.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Requested cache key is absent
    #[error("Key not found: {0}")]
    NotFound(String),

    /// The consistency authority could not be reached
    #[error("Consistency oracle unreachable: {0}")]
    OracleTransport(String),

    /// The consistency authority answered with a non-success status
    #[error("Consistency oracle returned status {0}")]
    OracleStatus(u16),

    /// The consistency authority answered with a malformed verdict
    #[error("Malformed consistency verdict: {0}")]
    OracleProtocol(String),

    /// The consistency authority did not answer in time
    #[error("Consistency oracle timed out after {0} ms")]
    OracleTimeout(u64),

    /// Neither the local cache nor the authority produced a result
    #[error("No servable result: {0}")]
    Unservable(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OrchestratorError {
    /// Returns true for failures of the remote consistency round trip.
    pub fn is_oracle_failure(&self) -> bool {
        matches!(
            self,
            OrchestratorError::OracleTransport(_)
                | OrchestratorError::OracleStatus(_)
                | OrchestratorError::OracleProtocol(_)
                | OrchestratorError::OracleTimeout(_)
        )
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for OrchestratorError {
    fn into_response(self) -> Response {
        let status = match &self {
            OrchestratorError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            OrchestratorError::NotFound(_) => StatusCode::NOT_FOUND,
            OrchestratorError::OracleTransport(_)
            | OrchestratorError::OracleStatus(_)
            | OrchestratorError::OracleProtocol(_)
            | OrchestratorError::Unservable(_) => StatusCode::BAD_GATEWAY,
            OrchestratorError::OracleTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            OrchestratorError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the orchestrator.
pub type Result<T> = std::result::Result<T, OrchestratorError>;
