//! Request DTOs for the orchestrator API
//!
//! Defines the structure of incoming query strings and request bodies.

use serde::Deserialize;

use crate::reconcile::{PageArgs, DEFAULT_PAGE_NUM, DEFAULT_PAGE_SIZE};

/// Largest page a single request may ask for.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Query string of the index endpoints (`GET /`, `GET /posts`).
///
/// Both parameters arrive as loose strings. A value that parses as a
/// non-negative integer is used; anything else falls back to the default
/// (`page_num = 1`, `page_size = 20`). Page 0 is read as page 1.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page_num: Option<String>,
    #[serde(default)]
    pub page_size: Option<String>,
}

impl PageQuery {
    /// Coerces the query into operation arguments.
    ///
    /// The result is what both the resolver and the authority see, so the
    /// probed versions and the forwarded arguments name the same page.
    pub fn to_args(&self) -> PageArgs {
        PageArgs {
            page_num: coerce(self.page_num.as_deref(), DEFAULT_PAGE_NUM).max(1),
            page_size: coerce(self.page_size.as_deref(), DEFAULT_PAGE_SIZE),
        }
    }

    /// Validates the coerced arguments
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        let args = self.to_args();
        if args.page_size > MAX_PAGE_SIZE {
            return Some(format!("page_size exceeds maximum of {}", MAX_PAGE_SIZE));
        }
        None
    }
}

fn coerce(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
