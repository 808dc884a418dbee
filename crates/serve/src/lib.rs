//! Shelf Serve Library
//!
//! HTTP interface for the Shelf product search service.

use shelf_core::Settings;

pub mod api;
pub mod cache;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use error::{ApiError, ErrorBody, ErrorKind};
pub use handlers::AppState;
pub use server::*;

/// Server version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_enabled: bool,
    pub max_request_size: usize,
    /// Development mode: enables setup routes and allows running without an API key
    pub dev_mode: bool,
    /// Bearer token required on API routes
    pub api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_enabled: true,
            max_request_size: 10 * 1024 * 1024, // 10MB
            dev_mode: false,
            api_key: None,
        }
    }
}

impl From<&Settings> for ServerConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            host: settings.server_host.clone(),
            port: settings.server_port,
            cors_enabled: settings.cors_enabled,
            max_request_size: settings.max_request_size,
            dev_mode: settings.is_dev(),
            api_key: settings.api_key().map(str::to_string),
        }
    }
}
