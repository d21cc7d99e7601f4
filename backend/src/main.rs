// main.rs

mod config;
mod state;
mod web;

use crate::config::Config;
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;

fn init_tracing() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,lorawatch_backend=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error=%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;
    let config = Config::from_env()?;

    // --- Shared state ---
    let state = Arc::new(AppState::new(&config));
    if !state.static_dir.join("index.html").exists() {
        tracing::warn!(dir=%state.static_dir.display(), "no index.html in static dir");
    }

    // --- Webserver ---
    let app: Router = web::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(bind=%config.bind, "lorawatch backend listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
