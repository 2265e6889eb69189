// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::api::http_server::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub dimension: usize,
    pub normalize: bool,
    pub version: String,
}

/// GET /health: reports the loaded model
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.embedder.model_name().to_string(),
        dimension: state.embedder.dimension(),
        normalize: state.embedder.normalizes(),
        version: crate::version::VERSION_NUMBER.to_string(),
    })
}
