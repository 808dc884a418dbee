//! Shelf Infrastructure Library
//!
//! Concrete backends for the Shelf service: the Elasticsearch REST client,
//! the Redis cache store, and logger initialization.

pub mod cache;
pub mod elastic;
pub mod logger;

pub use cache::{RedisCache, RedisConfig};
pub use elastic::{ElasticClient, ElasticConfig};
pub use logger::{init_logger, init_test_logger, LoggerConfig};

/// Infrastructure version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
