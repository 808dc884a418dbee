//! Shelf - product search service
//!
//! Shelf exposes a small HTTP API for indexing products into Elasticsearch
//! and running fuzzy title searches whose results are cached in Redis.

use clap::{Parser, Subcommand};
use shelf_core::{CacheStore, Result, SearchEngine, Settings, ShelfError};
use shelf_infra::{
    init_logger, ElasticClient, ElasticConfig, LoggerConfig, RedisCache, RedisConfig,
};
use shelf_serve::{AppState, ServerConfig, ShelfServer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Shelf - product search over Elasticsearch with a Redis result cache")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Configuration file path (settings are also read from the environment)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides SERVER_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides SERVER_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check that Elasticsearch and Redis are reachable
    Health,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?;

    let mut logger = LoggerConfig::from(&settings);
    if cli.verbose {
        logger.level = "debug".to_string();
    }
    if cli.json_logs {
        logger.json_format = true;
    }
    init_logger(logger)?;

    match cli.command {
        Some(Commands::Serve { host, port }) => handle_serve(settings, host, port).await,
        Some(Commands::Health) => handle_health(&settings).await,
        Some(Commands::Version) | None => {
            println!("{}", shelf_core::version_info());
            Ok(())
        }
    }
}

async fn handle_serve(
    mut settings: Settings,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(host) = host {
        settings.server_host = host;
    }
    if let Some(port) = port {
        settings.server_port = port;
    }
    settings.validate()?;

    info!(
        "Starting Shelf v{} in {} mode",
        env!("CARGO_PKG_VERSION"),
        settings.env
    );

    let engine = ElasticClient::new(ElasticConfig::from(&settings))?;
    if !engine.ping().await {
        error!("Elasticsearch is not reachable at {}", settings.elastic_host);
        return Err(ShelfError::network(format!(
            "Elasticsearch is not reachable at {}",
            settings.elastic_host
        )));
    }
    info!("Elasticsearch connected at {}", settings.elastic_host);

    let cache = Arc::new(RedisCache::connect(&RedisConfig::from(&settings)).await?);

    let state = AppState::new(ServerConfig::from(&settings), Arc::new(engine), cache.clone());
    let result = ShelfServer::new(state).start().await;

    cache.close().await;
    result
}

async fn handle_health(settings: &Settings) -> Result<()> {
    let engine = ElasticClient::new(ElasticConfig::from(settings))?;
    let search_engine = engine.ping().await;

    let cache = match RedisCache::connect(&RedisConfig::from(settings)).await {
        Ok(cache) => {
            let up = cache.ping().await;
            cache.close().await;
            up
        }
        Err(e) => {
            error!(retryable = e.is_retryable(), "{}", e);
            false
        }
    };

    println!("Shelf v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "  Elasticsearch ({}): {}",
        settings.elastic_host,
        status_label(search_engine)
    );
    println!(
        "  Redis ({}:{}): {}",
        settings.redis_host,
        settings.redis_port,
        status_label(cache)
    );

    if search_engine && cache {
        Ok(())
    } else {
        Err(ShelfError::network("one or more backends are unreachable"))
    }
}

fn status_label(up: bool) -> &'static str {
    if up {
        "ok"
    } else {
        "unreachable"
    }
}
