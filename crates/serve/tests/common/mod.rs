//! In-memory backends shared by the serve integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Method, Request, StatusCode},
    Router,
};
use serde_json::{Map, Value};
use shelf_core::{
    BulkDocument, BulkSummary, CacheStore, MatchOptions, Result, ScoredHit, SearchEngine,
    ShelfError,
};
use shelf_serve::{create_app, AppState, ServerConfig};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const API_KEY: &str = "test-secret";

/// Search engine keeping documents in a map, matching titles by substring
#[derive(Default)]
pub struct FakeEngine {
    documents: Mutex<HashMap<String, Value>>,
    next_id: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub bulk_calls: AtomicUsize,
    pub searches_time_out: AtomicBool,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn searches(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn bulk_requests(&self) -> usize {
        self.bulk_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    pub fn time_out_searches(&self) {
        self.searches_time_out.store(true, Ordering::SeqCst);
    }

    pub fn document(&self, id: &str) -> Option<Value> {
        self.documents.lock().unwrap().get(id).cloned()
    }

    fn insert(&self, id: Option<&str>, document: &Value) {
        let id = match id {
            Some(id) => id.to_string(),
            None => format!("auto-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
        };
        self.documents.lock().unwrap().insert(id, document.clone());
    }
}

#[async_trait]
impl SearchEngine for FakeEngine {
    async fn ping(&self) -> bool {
        true
    }

    async fn index_document(&self, _index: &str, document: &Value, id: Option<&str>) -> Result<()> {
        self.insert(id, document);
        Ok(())
    }

    async fn bulk_index(&self, _index: &str, documents: &[BulkDocument]) -> Result<BulkSummary> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);
        for entry in documents {
            self.insert(entry.id.as_deref(), &entry.document);
        }
        Ok(BulkSummary {
            indexed: documents.len(),
        })
    }

    async fn match_query(
        &self,
        _index: &str,
        field: &str,
        text: &str,
        size: usize,
        options: &MatchOptions,
    ) -> Result<Vec<ScoredHit>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.searches_time_out.load(Ordering::SeqCst) {
            return Err(ShelfError::timeout("search engine search"));
        }
        let needle = text.to_lowercase();

        let documents = self.documents.lock().unwrap();
        let mut hits: Vec<ScoredHit> = documents
            .values()
            .filter(|doc| {
                doc.get(field)
                    .and_then(Value::as_str)
                    .is_some_and(|value| value.to_lowercase().contains(&needle))
            })
            .map(|doc| {
                let mut source = Map::new();
                if let Some(object) = doc.as_object() {
                    for (key, value) in object {
                        let wanted = options
                            .fields
                            .as_ref()
                            .map_or(true, |fields| fields.contains(key));
                        if wanted {
                            source.insert(key.clone(), value.clone());
                        }
                    }
                }
                ScoredHit { score: 1.0, source }
            })
            .collect();
        hits.truncate(size);
        Ok(hits)
    }

    async fn match_all(&self, _index: &str) -> Result<Vec<Value>> {
        Ok(self.documents.lock().unwrap().values().cloned().collect())
    }

    async fn delete_by_id(&self, index: &str, id: &str) -> Result<()> {
        match self.documents.lock().unwrap().remove(id) {
            Some(_) => Ok(()),
            None => Err(ShelfError::not_found(format!("{index}/{id}"))),
        }
    }

    async fn delete_all(&self, _index: &str) -> Result<u64> {
        let mut documents = self.documents.lock().unwrap();
        let deleted = documents.len() as u64;
        documents.clear();
        Ok(deleted)
    }
}

/// Cache store backed by a map, with call counters and a write-failure switch
#[derive(Default)]
pub struct FakeCache {
    entries: Mutex<HashMap<String, (String, u64)>>,
    pub get_calls: AtomicUsize,
    pub set_calls: AtomicUsize,
    pub fail_writes: AtomicBool,
}

impl FakeCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), 3600));
    }

    pub fn entry(&self, key: &str) -> Option<(String, u64)> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn writes(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheStore for FakeCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(key)
            .map(|(value, _)| value.clone()))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ShelfError::cache("connection reset"));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), ttl_seconds));
        Ok(())
    }

    async fn ping(&self) -> bool {
        true
    }
}

/// Production-like configuration with an API key
pub fn secured_config() -> ServerConfig {
    ServerConfig {
        api_key: Some(API_KEY.to_string()),
        ..Default::default()
    }
}

/// Development configuration without an API key
pub fn dev_config() -> ServerConfig {
    ServerConfig {
        dev_mode: true,
        ..Default::default()
    }
}

pub fn app(config: ServerConfig, engine: Arc<FakeEngine>, cache: Arc<FakeCache>) -> Router {
    create_app(AppState::new(config, engine, cache))
}

/// Send a request through the router and collect the status and body
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

pub fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

pub fn product(id: &str, title: &str) -> Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "description": format!("{title} description"),
        "price": "19.99",
        "category": "general"
    })
}
