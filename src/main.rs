// =============================================================================
// stockpredict — Main Entry Point
// =============================================================================
//
// Serves price history, technical indicators and trend forecasts for Indian
// equities. Live data comes from the Yahoo chart API; any failure there is
// covered by deterministic synthetic data.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod catalog;
mod config;
mod error;
mod indicators;
mod market_data;
mod prediction;
mod yahoo;

use std::sync::Arc;

use anyhow::Context;
use axum::{extract::Request, ServiceExt};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::{AppConfig, DEFAULT_CONFIG_PATH};
use crate::market_data::MarketDataProvider;
use crate::yahoo::YahooClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "stockpredict starting up");

    let config = AppConfig::load_or_default(DEFAULT_CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "Failed to load config, using defaults");
        let mut config = AppConfig::default();
        config.apply_env_overrides();
        config
    });

    // ── 2. Live data provider ────────────────────────────────────────────
    let provider: Option<Arc<dyn MarketDataProvider>> = if config.offline {
        warn!("Offline mode: every series will be synthetic");
        None
    } else {
        let client = YahooClient::new(&config.provider_url, config.fetch_timeout())?;
        info!(url = %config.provider_url, timeout_secs = config.fetch_timeout_secs, "Live data enabled");
        Some(Arc::new(client))
    };

    // ── 3. Build shared state ────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, provider));

    // ── 4. Start the API server ──────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            warn!("Shutdown signal received — stopping gracefully");
        })
        .await
        .context("API server failed")?;

    info!("stockpredict shut down complete.");
    Ok(())
}
