//! Server module for the infrastructure inventory web service
//!
//! This module implements the server-side functionality including:
//! - HTTP endpoints for ingestion, search, export and bulk delete
//! - Hostname block parsing and CSV rendering
//! - Configuration loading and process lifecycle

pub mod commands;
pub mod config;
pub mod export;
pub mod import;
pub mod service;
pub mod tracing_setup;

use crate::server::config::Config;
use crate::server::service::AppState;
use anyhow::Result;
use clap::Parser;
use infra_inventory_storage::{create_storage, StorageConfig, StorageError};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage initialization failed: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser)]
#[command(name = "infra-inventory")]
#[command(about = "Infrastructure inventory web service", long_about = None)]
struct ServerCli {
    /// Path to config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

pub async fn run() -> Result<()> {
    let cli = ServerCli::parse();

    tracing_setup::init();
    info!("infra-inventory server starting");

    let config = match cli.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(&path).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?
        }
        None => {
            info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    run_server(config)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

/// Run the HTTP server with the given configuration until a shutdown signal
async fn run_server(config: Config) -> Result<(), ServerError> {
    let addr: SocketAddr = config
        .server
        .bind_address
        .parse()
        .map_err(|e| ServerError::Config(format!("Invalid bind address: {}", e)))?;

    let storage_config = StorageConfig::from_url(&config.database.url)
        .map_err(|e| ServerError::Config(format!("Invalid storage URL: {}", e)))?;

    info!(
        "Initializing storage: {} ({})",
        storage_config.path, config.database.url
    );

    // Create storage using the factory function (handles initialization)
    let storage = create_storage(&storage_config).await?;

    let state = AppState::new(Arc::clone(&storage), config.export.ttl());
    let app = service::router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("Starting HTTP server on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    storage.close().await?;
    info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
///
/// A handler that cannot be installed is logged and never fires; the other
/// signal still triggers shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = sigterm => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
