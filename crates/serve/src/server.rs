//! Server module for Shelf serve crate

use crate::api::create_routes;
use crate::handlers::AppState;
use crate::ServerConfig;
use axum::{extract::DefaultBodyLimit, Router};
use shelf_core::{Result, ShelfError};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shelf HTTP server
pub struct ShelfServer {
    config: ServerConfig,
    app: Router,
}

impl ShelfServer {
    /// Create a new server over the given application state
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        let app = create_app(state);

        Self { config, app }
    }

    /// Start the server and run until SIGINT or SIGTERM
    pub async fn start(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| ShelfError::network(format!("Invalid address {}: {}", addr, e)))?;

        if self.config.api_key.is_none() && !self.config.dev_mode {
            tracing::warn!("No API key configured; every API request will be rejected");
        }

        tracing::info!("Starting Shelf server on {}", addr);

        let listener = tokio::net::TcpListener::bind(socket_addr)
            .await
            .map_err(|e| ShelfError::network(format!("Failed to bind to {}: {}", addr, e)))?;

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }

    /// The application router with all middleware applied
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Create the Axum application with middleware
///
/// The body limit is enforced by the extractors, so over-limit bodies are
/// rejected through [`crate::ApiError`] like any other failure.
pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();
    let mut app = create_routes(state);

    app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(DefaultBodyLimit::max(config.max_request_size)),
    );

    if config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        app = app.layer(cors);
    }

    app
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
