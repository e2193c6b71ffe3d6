use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{http::StatusCode, Router};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use webembed::config::Config;
use webembed::{app, constants, AssetServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| constants::DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse configuration
    let config = Config::parse();
    config.validate()?;

    tracing::info!("Starting {}...", constants::APP_NAME);

    let server = AssetServer::new(config.asset_options());
    match server.validate() {
        Ok(()) => tracing::info!(
            folder = %server.folder_name(),
            files = server.file_count(),
            "Serving embedded assets under {}",
            constants::BASE_PATH
        ),
        Err(err) if config.strict_assets => {
            return Err(err).context("Embedded asset group is required by --strict-assets");
        }
        Err(err) => tracing::warn!(
            "{err}; every request under {} will answer 404",
            constants::BASE_PATH
        ),
    }

    // Requests outside the prefix end up here
    let next_stage = Router::new().fallback(|| async { StatusCode::NOT_FOUND });
    let app = app(Arc::new(server), next_stage);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Listening on: http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
