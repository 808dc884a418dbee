//! Error handling for Shelf core library

use std::fmt;
use thiserror::Error;

/// Result type alias for Shelf operations
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Main error type for Shelf operations
#[derive(Error, Debug)]
pub enum ShelfError {
    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),


    /// Malformed client input
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Missing or invalid credentials
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Resource not found errors
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Search engine rejected or failed a request
    #[error("Search engine error: {message}")]
    SearchEngine { message: String },

    /// Cache store failures
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// Network connectivity errors
    #[error("Network error: {message}")]
    Network { message: String },

    /// Timeout errors
    #[error("Operation timed out: {operation}")]
    Timeout { operation: String },
}

impl ShelfError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(config::ConfigError::Message(message.into()))
    }

    /// Create a bad request error
    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a search engine error
    pub fn search_engine<S: Into<String>>(message: S) -> Self {
        Self::SearchEngine {
            message: message.into(),
        }
    }

    /// Create a cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Check if error is retryable
    ///
    /// Shelf itself never retries; callers such as the `health` command use
    /// this to phrase their diagnostics.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Timeout { .. } | Self::Cache { .. }
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Io(_) => ErrorCategory::Io,
            Self::Json(_) => ErrorCategory::Serialization,
            Self::Config(_) | Self::Url(_) => ErrorCategory::Configuration,
            Self::BadRequest { .. } => ErrorCategory::Validation,
            Self::Unauthorized { .. } => ErrorCategory::Security,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::SearchEngine { .. } => ErrorCategory::SearchEngine,
            Self::Cache { .. } => ErrorCategory::Cache,
            Self::Network { .. } => ErrorCategory::Network,
            Self::Timeout { .. } => ErrorCategory::Timeout,
        }
    }
}

/// Error categories for logging
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Io,
    Serialization,
    Configuration,
    Validation,
    Security,
    NotFound,
    SearchEngine,
    Cache,
    Network,
    Timeout,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "io"),
            Self::Serialization => write!(f, "serialization"),
            Self::Configuration => write!(f, "configuration"),
            Self::Validation => write!(f, "validation"),
            Self::Security => write!(f, "security"),
            Self::NotFound => write!(f, "not_found"),
            Self::SearchEngine => write!(f, "search_engine"),
            Self::Cache => write!(f, "cache"),
            Self::Network => write!(f, "network"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}
