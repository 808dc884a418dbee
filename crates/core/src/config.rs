//! Configuration types for Shelf core library
//!
//! Settings are layered: built-in defaults, then an optional configuration
//! file, then process environment variables. Environment variable names are
//! un-prefixed (`ELASTIC_HOST`, `REDIS_PORT`, `ENV`, ...) and map one-to-one
//! onto the lowercase field names below.

use crate::{Result, ShelfError};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Name of the search engine index holding product documents
pub const PRODUCTS_INDEX: &str = "products";

/// Environment mode value that enables development behavior
pub const DEV_ENVIRONMENT: &str = "dev";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the search engine
    pub elastic_host: String,
    /// Per-request timeout for search engine calls, in seconds
    pub elastic_timeout_secs: u64,
    /// Cache store host
    pub redis_host: String,
    /// Cache store port
    pub redis_port: u16,
    /// Address the HTTP listener binds to
    pub server_host: String,
    /// Port the HTTP listener binds to
    pub server_port: u16,
    /// Shared bearer token required on API routes
    pub api_key: Option<String>,
    /// Environment mode; `dev` enables setup routes and relaxed auth
    pub env: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON
    pub log_json: bool,
    /// Enable permissive CORS
    pub cors_enabled: bool,
    /// Maximum accepted request body size in bytes
    pub max_request_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            elastic_host: "http://localhost:9200".to_string(),
            elastic_timeout_secs: 5,
            redis_host: "127.0.0.1".to_string(),
            redis_port: 6379,
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            api_key: None,
            env: "production".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            cors_enabled: true,
            max_request_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl Settings {
    /// Load settings from an optional file and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_environment(path, Environment::default().try_parsing(true))
    }

    /// Load settings from an optional file and the given environment source
    pub fn load_with_environment(path: Option<&Path>, environment: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        tracing::debug!(
            env = %settings.env,
            elastic_host = %settings.elastic_host,
            "Settings loaded"
        );
        Ok(settings)
    }

    /// Validate settings values
    pub fn validate(&self) -> Result<()> {
        self.elastic_url()?;

        if self.server_port == 0 {
            return Err(ShelfError::config("SERVER_PORT cannot be 0"));
        }
        if self.redis_port == 0 {
            return Err(ShelfError::config("REDIS_PORT cannot be 0"));
        }
        if self.elastic_timeout_secs == 0 {
            return Err(ShelfError::config(
                "ELASTIC_TIMEOUT_SECS must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Whether development mode is active
    pub fn is_dev(&self) -> bool {
        self.env == DEV_ENVIRONMENT
    }

    /// Parsed search engine URL
    pub fn elastic_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.elastic_host)?)
    }

    /// Search engine request timeout
    pub fn elastic_timeout(&self) -> Duration {
        Duration::from_secs(self.elastic_timeout_secs)
    }

    /// The configured API key, if any non-blank one is set
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}
