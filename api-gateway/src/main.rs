// api-gateway/src/main.rs

//! API gateway binary.
//!
//! This binary exposes a small HTTP API on top of the `watermark` crate:
//!
//! - `GET  /health`
//! - `GET  /requests/pending`
//! - `POST /requests/pending`
//! - `POST /requests/results`
//! - `POST /watermarks/register`
//! - `GET  /watermarks`
//!
//! It embeds the JSON-file registration ledger and an in-memory queue of
//! candidate/reference pairs for the external semantic-integrity
//! evaluator.

mod config;
mod routes;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;

use watermark::JsonFileRegistry;

use config::ApiConfig;
use routes::{health, requests, watermarks};
use state::{AppState, PendingQueue, SharedState};

#[tokio::main]
async fn main() {
    // Basic tracing setup.
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "api_gateway=info,watermark=info".to_string()),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    // For now we use default configs. These can be externalised later.
    let api_cfg = ApiConfig::default();

    // ---------------------------
    // Registration ledger
    // ---------------------------

    let registry = JsonFileRegistry::open(&api_cfg.registry).map_err(|e| {
        format!(
            "failed to open registry at {}: {e}",
            api_cfg.registry.path
        )
    })?;
    tracing::info!(
        path = %api_cfg.registry.path,
        records = registry.len(),
        "registration ledger loaded"
    );

    // ---------------------------
    // Shared state
    // ---------------------------

    let app_state: SharedState = Arc::new(AppState {
        registry: tokio::sync::Mutex::new(registry),
        pending: tokio::sync::Mutex::new(PendingQueue::new()),
    });

    // ---------------------------
    // HTTP router
    // ---------------------------

    let app = Router::new()
        .route("/health", get(health::health))
        .route(
            "/requests/pending",
            get(requests::list_pending).post(requests::add_pending),
        )
        .route("/requests/results", post(requests::post_result))
        .route("/watermarks", get(watermarks::list_watermarks))
        .route("/watermarks/register", post(watermarks::register_watermark))
        .with_state(app_state);

    // ---------------------------
    // axum 0.8 server (hyper 1 / tokio 1.48 style)
    // ---------------------------

    tracing::info!("API gateway listening on http://{}", api_cfg.listen_addr);

    let listener = tokio::net::TcpListener::bind(api_cfg.listen_addr)
        .await
        .map_err(|e| format!("failed to bind {}: {e}", api_cfg.listen_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("API server error: {e}"))?;

    Ok(())
}

/// Waits for Ctrl-C and returns, used for graceful shutdown.
async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
