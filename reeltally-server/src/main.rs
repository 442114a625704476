//! reeltally server - main entry point
//!
//! Loads configuration and wires the TMDB provider and redis cache into
//! the aggregation service, then serves the HTTP API until interrupted.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reeltally_server::cache::RedisMovieCache;
use reeltally_server::config::ServerConfig;
use reeltally_server::provider::TmdbProvider;
use reeltally_server::service::GenrePeriodService;
use reeltally_server::{build_router, AppState};

/// Command-line arguments for reeltally-server
#[derive(Parser, Debug)]
#[command(name = "reeltally-server")]
#[command(about = "Genre/period movie statistics service")]
#[command(version)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long, env = "REELTALLY_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "REELTALLY_PORT")]
    port: Option<u16>,

    /// Bind address (overrides the config file)
    #[arg(long, env = "REELTALLY_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reeltally_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config =
        ServerConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    let provider =
        Arc::new(TmdbProvider::new(&config.tmdb).context("Failed to create TMDB client")?);
    let cache =
        Arc::new(RedisMovieCache::new(&config.cache).context("Failed to create redis client")?);
    let service = Arc::new(GenrePeriodService::new(
        provider,
        cache,
        config.query.limits(),
    ));

    let app = build_router(AppState::new(service));

    let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .context("Invalid bind address")?;
    info!("Starting reeltally server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
