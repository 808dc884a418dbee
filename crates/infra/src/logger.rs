//! Logging infrastructure for Shelf
//!
//! This module provides centralized logging configuration
//! using the tracing ecosystem.

use shelf_core::{Result, Settings, ShelfError};
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to use JSON format
    pub json_format: bool,
    /// Whether to include timestamps
    pub with_timestamps: bool,
    /// Whether to include file/line information
    pub with_file_info: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamps: true,
            with_file_info: false,
        }
    }
}

impl From<&Settings> for LoggerConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            level: settings.log_level.clone(),
            json_format: settings.log_json,
            ..Default::default()
        }
    }
}

/// Parse and validate a log level string
pub fn parse_level(level: &str) -> Result<Level> {
    Level::from_str(level)
        .map_err(|e| ShelfError::config(format!("Invalid log level '{}': {}", level, e)))
}

/// Initialize the global logger with the given configuration
pub fn init_logger(config: LoggerConfig) -> Result<()> {
    let level = parse_level(&config.level)?;

    let mut env_filter = EnvFilter::from_default_env().add_directive(level.into());
    for directive in ["hyper=warn", "reqwest=warn", "h2=warn"] {
        let directive = directive
            .parse()
            .map_err(|e| ShelfError::config(format!("Invalid log directive: {}", e)))?;
        env_filter = env_filter.add_directive(directive);
    }

    let fmt_layer = if config.json_format {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_file(config.with_file_info)
            .with_line_number(config.with_file_info)
            .boxed()
    } else {
        let layer = fmt::layer()
            .with_target(true)
            .with_file(config.with_file_info)
            .with_line_number(config.with_file_info);

        if config.with_timestamps {
            layer.boxed()
        } else {
            layer.without_time().boxed()
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ShelfError::config(format!("Failed to initialize logger: {}", e)))?;

    tracing::info!("Logger initialized with level: {}", config.level);
    Ok(())
}

/// Initialize logger for testing (reduces noise)
pub fn init_test_logger() {
    let config = LoggerConfig {
        level: "warn".to_string(),
        with_timestamps: false,
        ..Default::default()
    };

    // Ignore errors if already initialized
    let _ = init_logger(config);
}
