//! Cache-aside layer for product search
//!
//! Results are cached in the external cache store under a key derived from
//! the query text and the requested projection. Writes to the index never
//! purge entries; staleness is bounded by the fixed TTL.

use serde::Serialize;
use serde_json::Value;
use shelf_core::query::DEFAULT_SEARCH_FIELD;
use shelf_core::{CacheStore, MatchOptions, Result, SearchEngine, PRODUCTS_INDEX};
use std::sync::Arc;
use tracing::{debug, warn};

/// Lifetime of a cached search result, in seconds
pub const SEARCH_CACHE_TTL_SECS: u64 = 3600;

/// Number of hits requested from the search engine
pub const SEARCH_PAGE_SIZE: usize = 10;

#[derive(Serialize)]
struct CacheKeyPayload<'a> {
    query: &'a str,
    fields: &'a [String],
}

/// Derive the cache key for a search request
///
/// The key is the JSON text `{"query":...,"fields":[...]}`. Field order is
/// significant: `["title","category"]` and `["category","title"]` are
/// different keys.
///
/// # Examples
///
/// ```
/// use shelf_serve::cache::search_cache::cache_key;
///
/// let key = cache_key("phone", &["title".to_string()]).unwrap();
/// assert_eq!(key, r#"{"query":"phone","fields":["title"]}"#);
/// ```
pub fn cache_key(query: &str, fields: &[String]) -> Result<String> {
    Ok(serde_json::to_string(&CacheKeyPayload { query, fields })?)
}

/// Search front-end that consults the cache store before the search engine
pub struct SearchCache {
    engine: Arc<dyn SearchEngine>,
    store: Arc<dyn CacheStore>,
    ttl_seconds: u64,
}

impl SearchCache {
    /// Creates a search cache over the given backends
    pub fn new(engine: Arc<dyn SearchEngine>, store: Arc<dyn CacheStore>) -> Self {
        Self {
            engine,
            store,
            ttl_seconds: SEARCH_CACHE_TTL_SECS,
        }
    }

    /// Search products by title
    ///
    /// On a hit the cached payload is returned as parsed JSON, or as a raw
    /// JSON string when it does not parse. An empty cached value counts as a
    /// miss. On a miss the engine is queried with fuzzy matching, and the
    /// result is written to the cache before returning. A failed cache write
    /// fails the search.
    pub async fn search(&self, query: &str, fields: &[String]) -> Result<Value> {
        let key = cache_key(query, fields)?;

        let cached = self.store.get(&key).await?.filter(|value| !value.is_empty());
        if let Some(cached) = cached {
            debug!(key = %key, "Search cache hit");
            return Ok(match serde_json::from_str(&cached) {
                Ok(value) => value,
                Err(e) => {
                    warn!(key = %key, "Cached search result is not valid JSON: {}", e);
                    Value::String(cached)
                }
            });
        }

        debug!(key = %key, "Search cache miss");
        let options = MatchOptions {
            fields: Some(fields.to_vec()),
            fuzzy: true,
        };
        let hits = self
            .engine
            .match_query(
                PRODUCTS_INDEX,
                DEFAULT_SEARCH_FIELD,
                query,
                SEARCH_PAGE_SIZE,
                &options,
            )
            .await?;

        let payload = serde_json::to_value(&hits)?;
        self.store
            .set_with_ttl(&key, &payload.to_string(), self.ttl_seconds)
            .await?;

        Ok(payload)
    }

    /// Expiry applied to new cache entries
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }
}
