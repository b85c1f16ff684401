//! Consistency oracle client.
//!
//! The remote authority is the only source of truth on whether the versions
//! observed locally are current.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::error::{OrchestratorError, Result};
use crate::reconcile::{CheckRequest, ConsistencyVerdict};

// == Oracle Trait ==
/// A remote authority that judges observed versions.
#[async_trait]
pub trait ConsistencyOracle: Send + Sync {
    /// Sends `request` to `endpoint` and returns the validated verdict.
    async fn verify(&self, endpoint: &str, request: &CheckRequest) -> Result<ConsistencyVerdict>;
}

// == HTTP Oracle ==
/// [`ConsistencyOracle`] speaking JSON over HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpOracle {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpOracle {
    // == Constructor ==
    /// Builds a client whose requests give up after `timeout`.
    ///
    /// # Arguments
    /// * `timeout` - Whole-request deadline, reported as `OracleTimeout` when hit
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("edge_orchestrator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OrchestratorError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl ConsistencyOracle for HttpOracle {
    async fn verify(&self, endpoint: &str, request: &CheckRequest) -> Result<ConsistencyVerdict> {
        debug!(
            endpoint,
            function = %request.function,
            keys = request.versions.len(),
            "sending consistency check"
        );

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OrchestratorError::OracleTimeout(self.timeout.as_millis() as u64)
                } else {
                    OrchestratorError::OracleTransport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(OrchestratorError::OracleStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| OrchestratorError::OracleTransport(format!("failed to read body: {e}")))?;
        let verdict: ConsistencyVerdict = serde_json::from_slice(&body)
            .map_err(|e| OrchestratorError::OracleProtocol(e.to_string()))?;

        verdict.validate()
    }
}
