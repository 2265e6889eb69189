// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbedResponse type for POST /embed

use serde::{Deserialize, Serialize};

/// Response body for POST /embed
///
/// # Example
/// ```json
/// {
///   "embeddings": [[0.1, 0.2, ...], [0.3, 0.4, ...]]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedResponse {
    /// One vector per input text, in input order
    pub embeddings: Vec<Vec<f32>>,
}

impl EmbedResponse {
    pub fn embedding_count(&self) -> usize {
        self.embeddings.len()
    }

    /// Dimension of the vectors, or `None` when the response is empty
    pub fn dimension(&self) -> Option<usize> {
        self.embeddings.first().map(Vec::len)
    }
}

impl From<Vec<Vec<f32>>> for EmbedResponse {
    fn from(embeddings: Vec<Vec<f32>>) -> Self {
        Self { embeddings }
    }
}
