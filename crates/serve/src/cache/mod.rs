//! Caching module for Shelf serve crate
//!
//! Cache-aside search over the external cache store.

pub mod search_cache;

pub use search_cache::{cache_key, SearchCache, SEARCH_CACHE_TTL_SECS, SEARCH_PAGE_SIZE};
