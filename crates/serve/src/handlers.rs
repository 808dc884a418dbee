//! HTTP handlers for Shelf serve crate

use crate::cache::SearchCache;
use crate::error::ApiError;
use crate::middleware::AuthPolicy;
use crate::ServerConfig;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shelf_core::{
    generate_fake_products, normalize_query, parse_fields, validate_product, validate_products,
    BulkDocument, CacheStore, Product, Result, SearchEngine, PRODUCTS_INDEX,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn SearchEngine>,
    pub search_cache: Arc<SearchCache>,
    pub config: ServerConfig,
    pub auth: AuthPolicy,
}

impl AppState {
    /// Create application state over already connected backends
    pub fn new(
        config: ServerConfig,
        engine: Arc<dyn SearchEngine>,
        cache_store: Arc<dyn CacheStore>,
    ) -> Self {
        let search_cache = Arc::new(SearchCache::new(engine.clone(), cache_store));
        let auth = AuthPolicy::from_config(&config);

        Self {
            engine,
            search_cache,
            config,
            auth,
        }
    }
}

/// Query parameters for `GET /search`
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    /// Comma-separated projection list
    pub fields: Option<String>,
}

/// Query parameters for `POST /setup/add-random-products`
#[derive(Debug, Default, Deserialize)]
pub struct SeedParams {
    #[serde(rename = "numberOfProducts")]
    pub number_of_products: Option<String>,
}

impl SeedParams {
    /// Requested count; missing or non-integer values count as zero
    pub fn count(&self) -> i64 {
        self.number_of_products
            .as_deref()
            .and_then(|n| n.trim().parse().ok())
            .unwrap_or(0)
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub search_engine: bool,
}

fn bulk_documents(products: &[Product]) -> Result<Vec<BulkDocument>> {
    products.iter().map(Product::to_bulk_document).collect()
}

/// Handler for `POST /products`: validate and bulk-index a batch
pub async fn handle_index_products(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> std::result::Result<StatusCode, ApiError> {
    let Json(payload) = payload?;

    let products = validate_products(&payload)?;
    let documents = bulk_documents(&products)?;

    let summary = state.engine.bulk_index(PRODUCTS_INDEX, &documents).await?;
    info!(indexed = summary.indexed, "Indexed products");

    Ok(StatusCode::OK)
}

/// Handler for `GET /products`
pub async fn handle_list_products(
    State(state): State<AppState>,
) -> std::result::Result<Json<Vec<Value>>, ApiError> {
    let documents = state.engine.match_all(PRODUCTS_INDEX).await?;
    Ok(Json(documents))
}

/// Handler for `PUT /products/:id`
pub async fn handle_upsert_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> std::result::Result<StatusCode, ApiError> {
    let Json(payload) = payload?;

    let product = validate_product(&payload)?;
    if product.id != id {
        return Err(ApiError::bad_request(format!(
            "path id `{}` does not match body id `{}`",
            id, product.id
        )));
    }

    let document = serde_json::to_value(&product).map_err(shelf_core::ShelfError::from)?;
    state
        .engine
        .index_document(PRODUCTS_INDEX, &document, Some(&id))
        .await?;
    info!(id = %id, "Indexed product");

    Ok(StatusCode::OK)
}

/// Handler for `DELETE /products/:id`
pub async fn handle_delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<StatusCode, ApiError> {
    state.engine.delete_by_id(PRODUCTS_INDEX, &id).await?;
    info!(id = %id, "Deleted product");
    Ok(StatusCode::OK)
}

/// Handler for `GET /search`
///
/// A missing or blank `q` answers `[]` without touching the cache or the
/// search engine.
pub async fn handle_search(
    State(state): State<AppState>,
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> std::result::Result<Json<Value>, ApiError> {
    let Query(params) = params?;

    let Some(query) = normalize_query(params.q.as_deref())? else {
        debug!("Blank search query, returning no results");
        return Ok(Json(Value::Array(Vec::new())));
    };
    let fields = parse_fields(params.fields.as_deref())?;

    let results = state.search_cache.search(&query, &fields).await?;
    Ok(Json(results))
}

/// Handler for `POST /setup/add-random-products`
pub async fn handle_add_random_products(
    State(state): State<AppState>,
    params: std::result::Result<Query<SeedParams>, QueryRejection>,
) -> std::result::Result<StatusCode, ApiError> {
    let Query(params) = params?;
    let products = generate_fake_products(params.count());
    if products.is_empty() {
        return Ok(StatusCode::OK);
    }

    let documents = bulk_documents(&products)?;
    let summary = state.engine.bulk_index(PRODUCTS_INDEX, &documents).await?;
    info!(indexed = summary.indexed, "Seeded random products");

    Ok(StatusCode::OK)
}

/// Handler for `DELETE /setup/delete-all-data`
pub async fn handle_delete_all_data(
    State(state): State<AppState>,
) -> std::result::Result<StatusCode, ApiError> {
    let deleted = state.engine.delete_all(PRODUCTS_INDEX).await?;
    info!(deleted, "Deleted all products");
    Ok(StatusCode::OK)
}

/// Handler for `GET /health`
pub async fn handle_health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let search_engine = state.engine.ping().await;

    Json(HealthResponse {
        status: if search_engine { "healthy" } else { "degraded" }.to_string(),
        version: crate::VERSION.to_string(),
        timestamp: chrono::Utc::now(),
        search_engine,
    })
}

/// Fallback for unknown routes
pub async fn handle_not_found() -> ApiError {
    ApiError::not_found()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_count_parsing() {
        let params = |n: Option<&str>| SeedParams {
            number_of_products: n.map(str::to_string),
        };

        assert_eq!(params(None).count(), 0);
        assert_eq!(params(Some("25")).count(), 25);
        assert_eq!(params(Some(" 7 ")).count(), 7);
        assert_eq!(params(Some("-5")).count(), -5);
        assert_eq!(params(Some("many")).count(), 0);
        assert_eq!(params(Some("2.5")).count(), 0);
    }

    #[test]
    fn test_bulk_documents_are_keyed_by_id() {
        let products = vec![Product {
            id: "p-1".to_string(),
            title: "Phone".to_string(),
            description: "A phone".to_string(),
            price: "199.00".to_string(),
            category: "electronics".to_string(),
        }];

        let documents = bulk_documents(&products).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id.as_deref(), Some("p-1"));
        assert_eq!(documents[0].document["title"], "Phone");
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: crate::VERSION.to_string(),
            timestamp: chrono::Utc::now(),
            search_engine: true,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["search_engine"], true);
    }
}
