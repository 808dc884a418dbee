//! Elasticsearch client implementation for Shelf infrastructure
//!
//! Talks to the engine's REST API directly with `reqwest`. Every request is
//! bounded by the configured timeout.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use shelf_core::{
    BulkDocument, BulkSummary, MatchOptions, Result, ScoredHit, SearchEngine, Settings, ShelfError,
};
use std::time::Duration;
use url::Url;

/// Maximum number of documents returned by a match-all query
pub const MATCH_ALL_LIMIT: usize = 1000;

/// Elasticsearch client configuration
#[derive(Debug, Clone)]
pub struct ElasticConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9200".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

impl From<&Settings> for ElasticConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            base_url: settings.elastic_host.clone(),
            timeout: settings.elastic_timeout(),
        }
    }
}

/// Elasticsearch client for the document store
#[derive(Debug, Clone)]
pub struct ElasticClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ElasticClient {
    /// Create a new Elasticsearch client
    pub fn new(config: ElasticConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ShelfError::search_engine(format!(
                "{} cannot be used as a base URL",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ShelfError::network(format!("Failed to build HTTP client: {}", e)))?;

        tracing::info!("Elasticsearch client initialized for {}", base_url);
        Ok(Self { base_url, client })
    }

    /// The engine base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| request_error(operation, e))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(ShelfError::search_engine(format!(
            "{} returned {}: {}",
            operation, status, body
        )))
    }

    async fn parse<T>(operation: &str, response: reqwest::Response) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        response.json().await.map_err(|e| {
            ShelfError::search_engine(format!("Failed to parse {} response: {}", operation, e))
        })
    }
}

#[async_trait]
impl SearchEngine for ElasticClient {
    async fn ping(&self) -> bool {
        match self.client.get(self.base_url.clone()).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!("Elasticsearch ping successful");
                true
            }
            Ok(response) => {
                tracing::error!("Elasticsearch ping returned {}", response.status());
                false
            }
            Err(e) => {
                tracing::error!("Elasticsearch cluster is down: {}", e);
                false
            }
        }
    }

    async fn index_document(&self, index: &str, document: &Value, id: Option<&str>) -> Result<()> {
        let request = match id {
            Some(id) => self.client.put(self.endpoint(&[index, "_doc", id])),
            None => self.client.post(self.endpoint(&[index, "_doc"])),
        };

        self.send("index", request.json(document)).await?;
        Ok(())
    }

    async fn bulk_index(&self, index: &str, documents: &[BulkDocument]) -> Result<BulkSummary> {
        if documents.is_empty() {
            return Ok(BulkSummary::default());
        }

        let body = bulk_body(index, documents)?;
        let mut url = self.endpoint(&["_bulk"]);
        url.query_pairs_mut().append_pair("refresh", "true");

        let request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body);

        let response = self.send("bulk", request).await?;
        let bulk: BulkResponse = Self::parse("bulk", response).await?;

        if bulk.errors {
            let failures: Vec<&Value> = bulk
                .items
                .iter()
                .filter_map(|item| item.get("index"))
                .filter(|action| action.get("error").is_some())
                .collect();
            let reason = failures
                .first()
                .and_then(|action| action["error"].get("reason"))
                .and_then(Value::as_str)
                .unwrap_or("unknown reason");

            tracing::error!(
                failed = failures.len(),
                total = documents.len(),
                "Bulk indexing reported item errors"
            );
            return Err(ShelfError::search_engine(format!(
                "bulk indexing failed for {} of {} documents: {}",
                failures.len(),
                documents.len(),
                reason
            )));
        }

        Ok(BulkSummary {
            indexed: bulk.items.len(),
        })
    }

    async fn match_query(
        &self,
        index: &str,
        field: &str,
        text: &str,
        size: usize,
        options: &MatchOptions,
    ) -> Result<Vec<ScoredHit>> {
        let request = self
            .client
            .post(self.endpoint(&[index, "_search"]))
            .json(&match_query_body(field, text, size, options));

        let response = self.send("search", request).await?;
        let search: SearchResponse = Self::parse("search", response).await?;

        Ok(search
            .hits
            .hits
            .into_iter()
            .map(|hit| ScoredHit {
                score: hit.score.unwrap_or(0.0),
                source: hit.source.unwrap_or_default(),
            })
            .collect())
    }

    async fn match_all(&self, index: &str) -> Result<Vec<Value>> {
        let body = json!({
            "query": { "match_all": {} },
            "size": MATCH_ALL_LIMIT,
        });
        let request = self.client.post(self.endpoint(&[index, "_search"])).json(&body);

        let response = self.send("match_all", request).await?;
        let search: SearchResponse = Self::parse("match_all", response).await?;

        Ok(search
            .hits
            .hits
            .into_iter()
            .filter_map(|hit| hit.source.map(Value::Object))
            .collect())
    }

    async fn delete_by_id(&self, index: &str, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.endpoint(&[index, "_doc", id]))
            .send()
            .await
            .map_err(|e| request_error("delete", e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ShelfError::not_found(format!("{}/{}", index, id)));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ShelfError::search_engine(format!(
                "delete returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }

    async fn delete_all(&self, index: &str) -> Result<u64> {
        let mut url = self.endpoint(&[index, "_delete_by_query"]);
        url.query_pairs_mut().append_pair("refresh", "true");

        let response = self
            .client
            .post(url)
            .json(&json!({ "query": { "match_all": {} } }))
            .send()
            .await
            .map_err(|e| request_error("delete_by_query", e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ShelfError::not_found(index.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ShelfError::search_engine(format!(
                "delete_by_query returned {}: {}",
                status, body
            )));
        }

        let deleted: DeleteByQueryResponse = Self::parse("delete_by_query", response).await?;
        Ok(deleted.deleted)
    }
}

fn request_error(operation: &str, err: reqwest::Error) -> ShelfError {
    if err.is_timeout() {
        ShelfError::timeout(format!("search engine {}", operation))
    } else if err.is_connect() {
        ShelfError::network(format!("Failed to reach search engine for {}: {}", operation, err))
    } else {
        ShelfError::search_engine(format!("{} request failed: {}", operation, err))
    }
}

/// Build the newline-delimited bulk request body
fn bulk_body(index: &str, documents: &[BulkDocument]) -> Result<String> {
    let mut body = String::new();
    for doc in documents {
        let action = match &doc.id {
            Some(id) => json!({ "index": { "_index": index, "_id": id } }),
            None => json!({ "index": { "_index": index } }),
        };
        body.push_str(&serde_json::to_string(&action)?);
        body.push('\n');
        body.push_str(&serde_json::to_string(&doc.document)?);
        body.push('\n');
    }
    Ok(body)
}

/// Build the `match` query request body
fn match_query_body(field: &str, text: &str, size: usize, options: &MatchOptions) -> Value {
    let matcher = if options.fuzzy {
        json!({ "query": text, "fuzziness": "AUTO" })
    } else {
        json!(text)
    };

    let mut query = Map::new();
    query.insert(field.to_string(), matcher);

    let source = match &options.fields {
        Some(fields) => json!(fields),
        None => json!(true),
    };

    json!({
        "query": { "match": query },
        "size": size,
        "_source": source,
    })
}

/// Search response payload
#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_score")]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: Option<Map<String, Value>>,
}

/// Bulk response payload
#[derive(Debug, Deserialize)]
struct BulkResponse {
    errors: bool,
    #[serde(default)]
    items: Vec<Value>,
}

/// Delete-by-query response payload
#[derive(Debug, Deserialize)]
struct DeleteByQueryResponse {
    #[serde(default)]
    deleted: u64,
}
