//! Backend service traits
//!
//! Shelf owns no durable state. Documents live in a search engine and query
//! results are cached in a key-value store; both are reached through the
//! traits below so the HTTP layer can be exercised against in-memory fakes.

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A document to be written by a bulk indexing call
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDocument {
    /// Explicit document id; the engine assigns one when absent
    pub id: Option<String>,
    /// Document body
    pub document: Value,
}

/// Outcome of a bulk indexing call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkSummary {
    pub indexed: usize,
}

/// Options for a match query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOptions {
    /// Source fields to return; `None` returns the whole document
    pub fields: Option<Vec<String>>,
    /// Tolerate minor spelling variations
    pub fuzzy: bool,
}

/// A ranked search hit: the relevance score plus the projected source fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHit {
    #[serde(rename = "_score")]
    pub score: f64,
    #[serde(flatten)]
    pub source: Map<String, Value>,
}

/// Document indexing and full-text query service
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Check whether the engine is reachable
    async fn ping(&self) -> bool;

    /// Index one document, replacing any existing document with the same id
    async fn index_document(&self, index: &str, document: &Value, id: Option<&str>) -> Result<()>;

    /// Index many documents in one request
    async fn bulk_index(&self, index: &str, documents: &[BulkDocument]) -> Result<BulkSummary>;

    /// Run a `match` query on one field and return ranked hits
    async fn match_query(
        &self,
        index: &str,
        field: &str,
        text: &str,
        size: usize,
        options: &MatchOptions,
    ) -> Result<Vec<ScoredHit>>;

    /// Return the sources of all documents in an index
    async fn match_all(&self, index: &str) -> Result<Vec<Value>>;

    /// Delete a document; fails with `NotFound` when it does not exist
    async fn delete_by_id(&self, index: &str, id: &str) -> Result<()>;

    /// Delete every document in an index, returning the number removed
    async fn delete_all(&self, index: &str) -> Result<u64>;
}

/// Key-value store with per-key expiry
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a value
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value that expires after `ttl_seconds`
    async fn set_with_ttl(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()>;

    /// Check whether the store is reachable
    async fn ping(&self) -> bool;
}
