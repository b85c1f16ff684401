//! Protocol data model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::CacheEntry;
use crate::error::{OrchestratorError, Result};

// == Aliases and Defaults ==
/// Cache key to the version observed locally, `-1` when absent.
pub type VersionMap = BTreeMap<String, i64>;

/// Ordered cache keys one request depends on.
pub type RwSet = Vec<String>;

/// Default page number when the request does not carry a usable one.
pub const DEFAULT_PAGE_NUM: u32 = 1;

/// Default page size when the request does not carry a usable one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

// == Wire Types ==
/// Pagination arguments of the index operation, forwarded to the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageArgs {
    pub page_num: u32,
    pub page_size: u32,
}

impl Default for PageArgs {
    fn default() -> Self {
        Self {
            page_num: DEFAULT_PAGE_NUM,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Body of the consistency check sent to the authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRequest {
    pub versions: VersionMap,
    pub function: String,
    pub args: PageArgs,
}

impl CheckRequest {
    pub fn new(versions: VersionMap, function: impl Into<String>, args: PageArgs) -> Self {
        Self {
            versions,
            function: function.into(),
            args,
        }
    }
}

/// The authority's answer to a [`CheckRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyVerdict {
    #[serde(rename = "checkResult")]
    pub check_result: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(
        rename = "updatedKeys",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_keys: Option<Vec<CacheEntry>>,
}

impl ConsistencyVerdict {
    /// Implicit verdict used when verification is skipped.
    pub fn fresh() -> Self {
        Self {
            check_result: true,
            result: None,
            updated_keys: None,
        }
    }

    /// Stale verdict carrying the authoritative result and entries.
    pub fn stale(result: Value, updated_keys: Vec<CacheEntry>) -> Self {
        Self {
            check_result: false,
            result: Some(result),
            updated_keys: Some(updated_keys),
        }
    }

    /// Rejects a stale verdict that carries no authoritative result.
    pub fn validate(self) -> Result<Self> {
        if !self.check_result && self.result.is_none() {
            return Err(OrchestratorError::OracleProtocol(
                "stale verdict without a result".to_string(),
            ));
        }
        Ok(self)
    }
}

// == Outcomes ==
/// Outcome handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndResult {
    /// Mirrors the verdict's `checkResult`
    pub success: bool,
    pub result: Value,
}

/// What the speculative executor produced.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalOutcome {
    /// Every dependency was cached and the page rendered
    Rendered(Value),
    /// A dependency was missing; nothing was rendered
    Unavailable { missing_key: String },
}

impl LocalOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, LocalOutcome::Rendered(_))
    }
}
