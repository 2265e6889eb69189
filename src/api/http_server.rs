// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{embed_handler, health_handler};
use crate::config::ServerConfig;
use crate::embeddings::TextEmbedder;

/// Shared handler state
///
/// The embedder is built once at startup and never replaced.
#[derive(Clone)]
pub struct AppState {
    pub embedder: Arc<dyn TextEmbedder>,
}

impl AppState {
    pub fn new(embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { embedder }
    }
}

/// Builds the router; request bodies are not size-limited
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/embed", post(embed_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves on an already-bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = create_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;
    Ok(())
}

/// Binds `config.bind_addr()` and serves until Ctrl-C
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Embedding server listening on http://{}", listener.local_addr()?);
    info!("   POST http://{}/embed", addr);

    serve(listener, state, shutdown_signal()).await?;

    info!("Embedding server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
