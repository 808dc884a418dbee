//! API module for Shelf serve crate

use crate::handlers::{
    handle_add_random_products, handle_delete_all_data, handle_delete_product,
    handle_health_check, handle_index_products, handle_list_products, handle_not_found,
    handle_search, handle_upsert_product, AppState,
};
use crate::middleware::{require_bearer_token, require_dev_mode};
use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};

/// Prefix of every authenticated route
pub const API_PREFIX: &str = "/api/v1";

/// API routes configuration
///
/// Setup routes check the environment before the bearer token, so outside
/// dev mode they answer `400` whatever the credentials.
pub fn create_routes(state: AppState) -> Router {
    let setup = Router::new()
        .route("/add-random-products", post(handle_add_random_products))
        .route("/delete-all-data", delete(handle_delete_all_data))
        .route_layer(from_fn_with_state(state.clone(), require_bearer_token))
        .route_layer(from_fn_with_state(state.clone(), require_dev_mode));

    let api = Router::new()
        .route(
            "/products",
            post(handle_index_products).get(handle_list_products),
        )
        .route(
            "/products/:id",
            put(handle_upsert_product).delete(handle_delete_product),
        )
        .route("/search", get(handle_search))
        .route_layer(from_fn_with_state(state.clone(), require_bearer_token))
        .nest("/setup", setup);

    Router::new()
        .route("/health", get(handle_health_check))
        .nest(API_PREFIX, api)
        .fallback(handle_not_found)
        .with_state(state)
}
