//! Shelf Core Library
//!
//! Domain types and rules for the Shelf product search service: the
//! product model and its indexing validation, search query validation,
//! synthetic product generation, settings, and the traits through which the
//! service talks to its search engine and cache store.

pub mod backend;
pub mod config;
pub mod error;
pub mod fake;
pub mod product;
pub mod query;

// Re-export commonly used types
pub use backend::{BulkDocument, BulkSummary, CacheStore, MatchOptions, ScoredHit, SearchEngine};
pub use config::{Settings, PRODUCTS_INDEX};
pub use error::{ErrorCategory, Result, ShelfError};
pub use fake::{generate_fake_products, MAX_FAKE_PRODUCTS};
pub use product::{validate_product, validate_products, Product};
pub use query::{normalize_query, parse_fields, MAX_QUERY_LENGTH};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version info as a formatted string
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
