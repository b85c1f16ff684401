//! Configuration Module
//!
//! Handles loading server and protocol configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default logical function name sent to the consistency authority.
pub const DEFAULT_BACKUP: &str = "get_index";

/// Default consistency authority endpoint.
pub const DEFAULT_REMOTE_URL: &str = "http://127.0.0.1:8080/check";

/// Settings that govern one reconciliation.
///
/// Passed by reference into [`crate::reconcile::ReconciliationEngine::reconcile`]
/// on every call; the engine holds no configuration of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolConfig {
    /// Whether to ask the authority to verify cached versions
    pub do_consistency_check: bool,
    /// Logical function name sent to the authority
    pub backup: String,
    /// Authority endpoint
    pub remote_url: String,
    /// Probability in [0, 1] of simulating a cold-cache miss
    pub cold_miss_prob: f64,
    /// Probability in [0, 1] of simulating a capacity eviction
    pub cap_miss_prob: f64,
    /// Upper bound on the authority round trip
    pub oracle_timeout_ms: u64,
    /// Upper bound on a single cache read
    pub cache_timeout_ms: u64,
    /// Serve the local result as if verification were disabled when the authority fails
    pub degrade_on_oracle_failure: bool,
}

impl ProtocolConfig {
    /// Injected miss threshold as a percentage in [0, 200].
    pub fn miss_threshold(&self) -> f64 {
        (self.cold_miss_prob + self.cap_miss_prob) * 100.0
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            do_consistency_check: true,
            backup: DEFAULT_BACKUP.to_string(),
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            cold_miss_prob: 0.0,
            cap_miss_prob: 0.0,
            oracle_timeout_ms: 2000,
            cache_timeout_ms: 250,
            degrade_on_oracle_failure: false,
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the local store can hold
    pub max_entries: usize,
    /// Lifetime hint in seconds attached to every cached entry
    pub cache_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Verbose tracing
    pub debug_print: bool,
    /// Reconciliation settings
    pub protocol: ProtocolConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 10000)
    /// - `CACHE_TTL` - Entry lifetime hint in seconds (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `DEBUGPRINT` - Verbose tracing (default: false)
    /// - `DO_CONSISTENCY_CHECK` - Verify versions with the authority (default: true)
    /// - `BACKUP` - Function name sent to the authority (default: get_index)
    /// - `REMOTE_URL` - Authority endpoint
    /// - `COLD_MISS_PROB`, `CAP_MISS_PROB` - Injected miss probabilities (default: 0)
    /// - `ORACLE_TIMEOUT_MS` - Authority round trip bound (default: 2000)
    /// - `CACHE_TIMEOUT_MS` - Single cache read bound (default: 250)
    /// - `DEGRADE_ON_ORACLE_FAILURE` - Trust the cache when the authority fails (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |name: &str, default: bool| {
            lookup(name)
                .and_then(|v| parse_bool(&v))
                .unwrap_or(default)
        };
        let probability = |name: &str| {
            parse_var::<f64, _>(&lookup, name)
                .filter(|p| p.is_finite())
                .map(|p| p.clamp(0.0, 1.0))
                .unwrap_or(0.0)
        };

        let protocol = ProtocolConfig {
            do_consistency_check: flag(
                "DO_CONSISTENCY_CHECK",
                defaults.protocol.do_consistency_check,
            ),
            backup: lookup("BACKUP").unwrap_or(defaults.protocol.backup),
            remote_url: lookup("REMOTE_URL").unwrap_or(defaults.protocol.remote_url),
            cold_miss_prob: probability("COLD_MISS_PROB"),
            cap_miss_prob: probability("CAP_MISS_PROB"),
            oracle_timeout_ms: parse_var(&lookup, "ORACLE_TIMEOUT_MS")
                .unwrap_or(defaults.protocol.oracle_timeout_ms),
            cache_timeout_ms: parse_var(&lookup, "CACHE_TIMEOUT_MS")
                .unwrap_or(defaults.protocol.cache_timeout_ms),
            degrade_on_oracle_failure: flag(
                "DEGRADE_ON_ORACLE_FAILURE",
                defaults.protocol.degrade_on_oracle_failure,
            ),
        };

        Self {
            max_entries: parse_var(&lookup, "MAX_ENTRIES").unwrap_or(defaults.max_entries),
            cache_ttl: parse_var(&lookup, "CACHE_TTL").unwrap_or(defaults.cache_ttl),
            server_port: parse_var(&lookup, "SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var(&lookup, "CLEANUP_INTERVAL")
                .unwrap_or(defaults.cleanup_interval),
            debug_print: flag("DEBUGPRINT", defaults.debug_print),
            protocol,
        }
    }

    /// Default tracing filter when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug_print {
            "edge_orchestrator=debug,tower_http=debug"
        } else {
            "edge_orchestrator=info,tower_http=info"
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            cache_ttl: 1000,
            server_port: 3000,
            cleanup_interval: 1,
            debug_print: false,
            protocol: ProtocolConfig::default(),
        }
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(name).and_then(|v| v.trim().parse().ok())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
