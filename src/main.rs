//! Token assets server - Main executable
//!
//! Serves token metadata and logos from local per-chain token lists, filling
//! gaps from Helius metadata and the Trust Wallet CDN and caching whatever it
//! discovers.
use anyhow::Context;
use dotenv::dotenv;
use log::info;
use std::sync::Arc;
use token_assets::{AppConfig, AssetsRouter, Router, ServiceContainer};
use tokio::net::TcpListener;

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!("Starting token assets server v{}", token_assets::VERSION);

    let config = AppConfig::from_env();
    info!("Serving assets from {}", config.root_dir.display());

    let address = format!("{}:{}", config.host, config.port);
    let services = Arc::new(ServiceContainer::new(config));
    let app = AssetsRouter::new(services).setup_routes();

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;
    info!("Assets server running on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutting down assets server");
        })
        .await
        .context("Server error")?;

    Ok(())
}
