// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! HTTP client for the /embed endpoint
//!
//! Document indexers and retrieval pipelines call the server through this
//! client: `embed_documents` for chunks, `embed_query` for a single question.

use crate::api::{EmbedRequest, EmbedResponse};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8081/embed";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to call embed server: {0}")]
    Request(#[source] reqwest::Error),

    #[error("embed server returned status: {0}")]
    Status(StatusCode),

    #[error("failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("embed server returned no embeddings")]
    EmptyResponse,
}

#[derive(Debug, Clone)]
pub struct EmbedClient {
    endpoint: String,
    http: reqwest::Client,
}

impl Default for EmbedClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl EmbedClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Reuses an existing reqwest client (connection pool, timeouts)
    pub fn with_http_client(endpoint: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Embeds many texts in one request; output order matches input order
    pub async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ClientError> {
        debug!("POST {} ({} texts)", self.endpoint, texts.len());

        let response = self
            .http
            .post(&self.endpoint)
            .json(&EmbedRequest::new(texts.to_vec()))
            .send()
            .await
            .map_err(ClientError::Request)?;

        if response.status() != StatusCode::OK {
            return Err(ClientError::Status(response.status()));
        }

        let body: EmbedResponse = response.json().await.map_err(ClientError::Decode)?;
        Ok(body.embeddings)
    }

    /// Embeds a single text
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>, ClientError> {
        self.embed_documents(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(ClientError::EmptyResponse)
    }
}
