//! whitecube-api - Main entry point
//!
//! Gallery back-office microservice: catalogue CRUD, image uploads to object
//! storage and storage maintenance.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use whitecube_api::storage::{MemoryStore, ObjectStore, S3Store};
use whitecube_api::AppState;
use whitecube_common::config::{resolve_data_dir, StorageSettings};
use whitecube_common::db::init_database_pool;

/// Command-line arguments for whitecube-api
#[derive(Parser, Debug)]
#[command(name = "whitecube-api")]
#[command(about = "Gallery back-office API service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5850", env = "WHITECUBE_PORT")]
    port: u16,

    /// Data directory (overrides environment and config file)
    #[arg(short, long)]
    data_dir: Option<String>,

    /// Object storage backend: `s3` or `memory`
    #[arg(long, default_value = "s3", env = "WHITECUBE_STORAGE")]
    storage: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "whitecube_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let data_dir = resolve_data_dir(args.data_dir.as_deref(), "WHITECUBE_DATA_DIR");
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
    info!("Data directory: {}", data_dir.display());

    let db = init_database_pool(&data_dir.join("whitecube.db"))
        .await
        .context("Failed to initialize database")?;

    let store: Arc<dyn ObjectStore> = match args.storage.as_str() {
        "memory" => {
            info!("Using in-memory object storage");
            Arc::new(MemoryStore::new())
        }
        "s3" => {
            let settings = StorageSettings::from_env();
            info!("Using S3 object storage (prefix '{}')", settings.bucket_prefix);
            Arc::new(
                S3Store::new(settings)
                    .await
                    .context("Failed to initialize S3 storage")?,
            )
        }
        other => anyhow::bail!("Unknown storage backend: {}", other),
    };

    let app = whitecube_api::build_router(AppState::new(db, store));

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("Starting HTTP server on {}", addr);

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
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
