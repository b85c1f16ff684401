//! Index page collaborators.
//!
//! The resolver maps pagination arguments to the keys a page reads; the
//! renderer turns the cached entries into the response body.

use serde_json::{json, Value};

use crate::cache::CacheEntry;
use crate::reconcile::{PageArgs, RwSet};

/// Maps request arguments to the ordered keys the request depends on.
pub trait Resolver: Send + Sync {
    fn resolve(&self, args: &PageArgs) -> RwSet;
}

/// Produces a result from the full ordered dependency entries.
///
/// Must be deterministic: the same entries always render the same value.
pub trait Renderer: Send + Sync {
    fn render(&self, entries: &[CacheEntry]) -> Value;
}

/// Resolves page `n` of size `s` to keys `{prefix}{(n-1)*s+1}` through `{prefix}{n*s}`.
///
/// Page 0 is read as page 1.
#[derive(Debug, Clone)]
pub struct PageResolver {
    prefix: String,
}

impl PageResolver {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for PageResolver {
    fn default() -> Self {
        Self::new("post:")
    }
}

impl Resolver for PageResolver {
    fn resolve(&self, args: &PageArgs) -> RwSet {
        let page = u64::from(args.page_num.max(1));
        let size = u64::from(args.page_size);
        let first = (page - 1) * size + 1;

        (first..first + size)
            .map(|n| format!("{}{}", self.prefix, n))
            .collect()
    }
}

/// Renders entries as `{"count": n, "posts": [...]}` in RW-set order.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexRenderer;

impl Renderer for IndexRenderer {
    fn render(&self, entries: &[CacheEntry]) -> Value {
        let posts: Vec<Value> = entries
            .iter()
            .map(|entry| {
                json!({
                    "id": entry.id,
                    "key": entry.key,
                    "version": entry.version,
                    "value": entry.value,
                })
            })
            .collect();

        json!({
            "count": posts.len(),
            "posts": posts,
        })
    }
}
