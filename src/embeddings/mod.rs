// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Sentence embedding models
//!
//! [`TextEmbedder`] is the seam between the HTTP layer and whatever produces
//! vectors. Production uses [`OnnxEmbeddingModel`]; [`HashEmbedder`] gives
//! deterministic vectors without model files for tests and offline runs.

pub mod hub;
pub mod onnx_model;
pub mod pooling;
pub mod variant;

pub use hub::{resolve_model_files, ModelFiles};
pub use onnx_model::OnnxEmbeddingModel;
pub use pooling::{l2_norm, l2_normalize, Pooling};
pub use variant::{ModelSpec, ModelVariant, ALL_MINILM_L6_V2, BGE_M3};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Converts an ordered list of texts into an ordered list of fixed-length vectors
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Returns one vector per input text, in input order
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Length of every vector returned by `encode`
    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;

    /// Whether returned vectors have unit length
    fn normalizes(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct HashEmbedderConfig {
    pub model: String,
    pub dimension: usize,
    pub normalize: bool,
}

impl HashEmbedderConfig {
    /// Config mirroring a real variant's name, dimension and normalization
    pub fn for_spec(spec: &ModelSpec) -> Self {
        Self {
            model: spec.name.to_string(),
            dimension: spec.dimension,
            normalize: spec.normalize,
        }
    }
}

/// Deterministic pseudo-random embeddings seeded by a hash of the text
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    config: HashEmbedderConfig,
}

impl HashEmbedder {
    pub fn new(config: HashEmbedderConfig) -> Result<Self> {
        if config.dimension == 0 {
            return Err(anyhow!("Embedding dimension must be greater than 0"));
        }

        Ok(Self { config })
    }

    pub fn generate(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.config.dimension);

        let mut current_seed = seed;
        for i in 0..self.config.dimension {
            // Linear congruential step
            current_seed =
                (current_seed.wrapping_mul(1664525).wrapping_add(1013904223)) ^ (i as u64);

            // Map to [-1, 1]
            let value = (current_seed as f64 / u64::MAX as f64) * 2.0 - 1.0;
            embedding.push(value as f32);
        }

        if self.config.normalize {
            l2_normalize(&mut embedding);
        }

        embedding
    }
}

#[async_trait]
impl TextEmbedder for HashEmbedder {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.generate(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn normalizes(&self) -> bool {
        self.config.normalize
    }
}
