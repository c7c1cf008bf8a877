//! showcase server entry point.
//!
//! Boots the HTTP server: content endpoint, link preview endpoint, and the
//! static asset directory as the fallback route.

use anyhow::Result;
use showcase_core::AppConfig;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod api;
mod error;
mod handler;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = AppConfig::load()?;
    let state = handler::AppState::from_config(&config)?;
    let app = handler::create_router(state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        static_dir = %config.static_dir.display(),
        content_ttl_secs = config.content_cache_ttl_seconds,
        "Server starting"
    );

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
