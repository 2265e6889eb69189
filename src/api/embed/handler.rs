// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed HTTP handler

use crate::api::embed::{EmbedRequest, EmbedResponse};
use crate::api::http_server::AppState;
use crate::api::ApiError;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use tracing::{debug, error};

/// POST /embed handler
///
/// # Request Body
/// ```json
/// { "texts": ["text1", "text2"] }
/// ```
///
/// # Response Body
/// ```json
/// { "embeddings": [[0.1, 0.2, ...], [0.3, 0.4, ...]] }
/// ```
///
/// `texts` that is not a list of strings yields 400
/// `{"error": "texts must be a list"}`. Model failures yield an opaque 500.
pub async fn embed_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let Json(body) = payload?;
    let request = EmbedRequest::try_from(body)?;

    if request.texts.is_empty() {
        return Ok(Json(EmbedResponse::default()));
    }

    debug!(
        "Embedding {} texts with {}",
        request.texts.len(),
        state.embedder.model_name()
    );

    let embeddings = state.embedder.encode(&request.texts).await?;

    if embeddings.len() != request.texts.len() {
        error!(
            "Embedder returned {} vectors for {} texts",
            embeddings.len(),
            request.texts.len()
        );
        return Err(ApiError::InternalError(
            "embedding count does not match input count".to_string(),
        ));
    }

    Ok(Json(EmbedResponse::from(embeddings)))
}
