//! Redis cache store for Shelf
//!
//! One multiplexed connection is opened at startup and shared by every
//! request through a cloneable `ConnectionManager`, which reconnects on its
//! own after transient failures.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use shelf_core::{CacheStore, Result, Settings, ShelfError};

/// Redis connection configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
        }
    }
}

impl From<&Settings> for RedisConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            host: settings.redis_host.clone(),
            port: settings.redis_port,
        }
    }
}

impl RedisConfig {
    /// Connection URL for this configuration
    pub fn url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }
}

/// Cache store backed by Redis
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    /// Open the shared connection
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url())
            .map_err(|e| ShelfError::cache(format!("Invalid Redis URL {}: {}", config.url(), e)))?;

        let connection = client.get_connection_manager().await.map_err(|e| {
            tracing::error!("Redis connection error: {}", e);
            ShelfError::cache(format!(
                "Failed to connect to Redis at {}:{}: {}",
                config.host, config.port, e
            ))
        })?;

        tracing::info!("Redis connected at {}:{}", config.host, config.port);
        Ok(Self { connection })
    }

    /// Close the connection during shutdown
    ///
    /// Errors are logged, not returned.
    pub async fn close(&self) {
        tracing::info!("Closing Redis connection...");
        let mut connection = self.connection.clone();
        match redis::cmd("QUIT").query_async::<_, ()>(&mut connection).await {
            Ok(()) => tracing::info!("Redis connection closed"),
            Err(e) => tracing::warn!("Error closing Redis connection: {}", e),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut connection = self.connection.clone();
        connection
            .get(key)
            .await
            .map_err(|e| ShelfError::cache(format!("GET failed: {}", e)))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        let mut connection = self.connection.clone();
        connection
            .set_ex::<_, _, ()>(key, value, ttl_seconds)
            .await
            .map_err(|e| ShelfError::cache(format!("SETEX failed: {}", e)))
    }

    async fn ping(&self) -> bool {
        let mut connection = self.connection.clone();
        match redis::cmd("PING").query_async::<_, String>(&mut connection).await {
            Ok(reply) => reply == "PONG",
            Err(e) => {
                tracing::warn!("Redis ping failed: {}", e);
                false
            }
        }
    }
}
