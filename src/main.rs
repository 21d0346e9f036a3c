//! site-manager server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use site_manager::config::ManagerConfig;
use site_manager::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = ManagerConfig::from_env()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    tracing::info!(
        addr = %config.listen_addr,
        persistence = config.persistence_enabled,
        dedup = %config.dedup_strategy,
        "starting site-manager"
    );

    // Build gateways, services and state
    let state = server::build_state(&config)
        .await
        .context("failed to initialise services")?;
    let inbox = std::sync::Arc::clone(&state.inbox);

    // Build router
    let app = server::build_app(state, &config.storage_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested");
        })
        .await?;

    inbox.close();
    Ok(())
}
