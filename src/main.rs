//! country-tally server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use country_tally::app_state::AppState;
use country_tally::config::TallyConfig;
use country_tally::domain::SystemClock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = TallyConfig::from_env().context("failed to load configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        addr = %config.listen_addr,
        rate_limit_window_secs = config.rate_limit_window_secs,
        "starting country-tally"
    );

    // Build application state
    let app_state = AppState::from_config(&config, Arc::new(SystemClock))
        .await
        .context("failed to build application state")?;
    tracing::info!(
        backend = app_state.store.backend(),
        configured = app_state.store.is_configured(),
        "submissions store ready"
    );

    // Build router
    let app = country_tally::app_with_timeout(
        app_state,
        Duration::from_secs(config.request_timeout_secs),
    );

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
