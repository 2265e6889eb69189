// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Embedding Model Wrapper
//!
//! Runs a sentence-transformer encoder exported to ONNX through ONNX Runtime.
//!
//! Features:
//! - ONNX model loading from disk or the Hugging Face hub cache
//! - GPU acceleration via CUDA (with automatic CPU fallback)
//! - Tokenization with truncation to the model's max length
//! - One batched inference per request, padded to the longest input
//! - Mean or CLS pooling, optional L2 normalization

use crate::embeddings::{
    l2_normalize, resolve_model_files, ModelSpec, ModelVariant, TextEmbedder,
};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, Axis, Ix2};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info, warn};

const INTRA_THREADS: usize = 4;

/// ONNX-based sentence embedding model
///
/// Cloning is cheap: the session and tokenizer are shared behind `Arc`.
/// Concurrent callers serialize on the session mutex.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    /// ONNX Runtime session (`run` needs exclusive access)
    session: Arc<Mutex<Session>>,

    tokenizer: Arc<Tokenizer>,

    spec: ModelSpec,

    /// Token id written into padded positions
    pad_id: u32,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.spec.name)
            .field("dimension", &self.spec.dimension)
            .field("max_length", &self.spec.max_length)
            .field("pooling", &self.spec.pooling)
            .field("normalize", &self.spec.normalize)
            .finish_non_exhaustive()
    }
}

/// Padded token tensors for one batch
struct EncodedBatch {
    input_ids: Array2<i64>,
    attention_mask: Array2<i64>,
    token_type_ids: Array2<i64>,
}

impl OnnxEmbeddingModel {
    /// Loads a variant from `model_dir`, or from the hub cache when `None`
    pub async fn load(variant: ModelVariant, model_dir: Option<&Path>) -> Result<Self> {
        let spec = variant.spec();
        let files = resolve_model_files(spec, model_dir).await?;
        Self::new(spec, files.model_path, files.tokenizer_path).await
    }

    /// Creates a model from explicit file paths
    ///
    /// # Errors
    /// Returns error if:
    /// - Model or tokenizer file not found or invalid
    /// - ONNX Runtime initialization fails
    /// - The probe inference does not produce `spec.dimension` values
    ///
    /// # Example
    /// ```ignore
    /// let model = OnnxEmbeddingModel::new(
    ///     ALL_MINILM_L6_V2,
    ///     "/workspace/models/all-MiniLM-L6-v2-onnx/model.onnx",
    ///     "/workspace/models/all-MiniLM-L6-v2-onnx/tokenizer.json",
    /// ).await?;
    /// ```
    pub async fn new<P: AsRef<Path>>(spec: ModelSpec, model_path: P, tokenizer_path: P) -> Result<Self> {
        let model_path = model_path.as_ref().to_path_buf();
        let tokenizer_path = tokenizer_path.as_ref().to_path_buf();

        tokio::task::spawn_blocking(move || Self::new_blocking(spec, model_path, tokenizer_path))
            .await
            .context("Model loading task panicked")?
    }

    fn new_blocking(spec: ModelSpec, model_path: PathBuf, tokenizer_path: PathBuf) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        info!("🚀 Initializing ONNX embedding model {}", spec.name);
        let session = Self::build_session(&model_path)?;
        info!("✅ ONNX session created for {}", spec.name);

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: spec.max_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow!("Failed to configure truncation: {}", e))?;
        // Padding is done per batch below
        tokenizer.with_padding(None);

        let pad_id = tokenizer.token_to_id(spec.pad_token).unwrap_or(0);

        let model = Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            spec,
            pad_id,
        };

        // Probe inference to confirm the graph matches the declared dimension
        let probe = model.infer(&["validation test".to_string()])?;
        let got = probe.first().map(Vec::len).unwrap_or(0);
        if got != spec.dimension {
            anyhow::bail!(
                "Model {} outputs {} dimensions (expected {})",
                spec.name,
                got,
                spec.dimension
            );
        }

        info!(
            "✓ Loaded embedding model {} ({} dimensions, normalize={})",
            spec.name, spec.dimension, spec.normalize
        );
        Ok(model)
    }

    /// Tries CUDA first, falls back to CPU if unavailable
    fn build_session(model_path: &Path) -> Result<Session> {
        info!("   Attempting CUDA execution provider...");
        let cuda_result = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CUDAExecutionProvider::default().build()])
            .context("Failed to set CUDA execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(INTRA_THREADS)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path);

        match cuda_result {
            Ok(session) => {
                info!("✅ CUDA execution provider initialized");
                Ok(session)
            }
            Err(e) => {
                warn!("⚠️  CUDA execution provider failed: {}", e);
                warn!("   Falling back to CPU execution provider");
                Session::builder()
                    .context("Failed to create session builder")?
                    .with_execution_providers([CPUExecutionProvider::default().build()])
                    .context("Failed to set CPU execution provider")?
                    .with_optimization_level(GraphOptimizationLevel::Level3)
                    .context("Failed to set optimization level")?
                    .with_intra_threads(INTRA_THREADS)
                    .context("Failed to set intra threads")?
                    .commit_from_file(model_path)
                    .with_context(|| {
                        format!("Failed to load ONNX model from {}", model_path.display())
                    })
            }
        }
    }

    /// Tokenizes all texts and pads them to the longest sequence
    fn tokenize(&self, texts: &[String]) -> Result<EncodedBatch> {
        let encodings = texts
            .iter()
            .map(|text| {
                self.tokenizer
                    .encode(text.as_str(), true)
                    .map_err(|e| anyhow!("Tokenization failed: {}", e))
            })
            .collect::<Result<Vec<_>>>()?;

        let max_len = encodings
            .iter()
            .map(|enc| enc.get_ids().len())
            .max()
            .unwrap_or(0);

        let capacity = texts.len() * max_len;
        let mut input_ids = Vec::with_capacity(capacity);
        let mut attention_mask = Vec::with_capacity(capacity);
        let mut token_type_ids = Vec::with_capacity(capacity);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let padding_needed = max_len - ids.len();

            input_ids.extend(ids.iter().map(|&id| id as i64));
            attention_mask.extend(encoding.get_attention_mask().iter().map(|&m| m as i64));
            token_type_ids.extend(encoding.get_type_ids().iter().map(|&t| t as i64));

            input_ids.extend(std::iter::repeat(self.pad_id as i64).take(padding_needed));
            attention_mask.extend(std::iter::repeat(0i64).take(padding_needed));
            token_type_ids.extend(std::iter::repeat(0i64).take(padding_needed));
        }

        let shape = (texts.len(), max_len);
        Ok(EncodedBatch {
            input_ids: Array2::from_shape_vec(shape, input_ids)
                .context("Failed to create input_ids array")?,
            attention_mask: Array2::from_shape_vec(shape, attention_mask)
                .context("Failed to create attention_mask array")?,
            token_type_ids: Array2::from_shape_vec(shape, token_type_ids)
                .context("Failed to create token_type_ids array")?,
        })
    }

    /// Runs one batched inference and pools, without normalization or checks
    fn infer(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let batch = self.tokenize(texts)?;
        let mask_for_pooling = batch.attention_mask.clone();

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("ONNX session lock poisoned"))?;

        let outputs = if self.spec.uses_token_type_ids {
            session.run(ort::inputs![
                "input_ids" => Value::from_array(batch.input_ids)?,
                "attention_mask" => Value::from_array(batch.attention_mask)?,
                "token_type_ids" => Value::from_array(batch.token_type_ids)?
            ])?
        } else {
            session.run(ort::inputs![
                "input_ids" => Value::from_array(batch.input_ids)?,
                "attention_mask" => Value::from_array(batch.attention_mask)?
            ])?
        };

        // Output names differ between exports, so take the first output
        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        let mut embeddings = Vec::with_capacity(texts.len());
        match output.ndim() {
            // Token-level states: [batch, seq_len, hidden_dim]
            3 => {
                for (batch_idx, mask_row) in mask_for_pooling.outer_iter().enumerate() {
                    let tokens = output
                        .index_axis(Axis(0), batch_idx)
                        .into_dimensionality::<Ix2>()
                        .context("Unexpected token embedding shape")?;
                    let mask: Vec<i64> = mask_row.to_vec();
                    embeddings.push(self.spec.pooling.pool(tokens, &mask));
                }
            }
            // Already pooled: [batch, hidden_dim]
            2 => {
                for row in output.outer_iter() {
                    embeddings.push(row.iter().copied().collect());
                }
            }
            _ => anyhow::bail!(
                "Model outputs unexpected shape: {:?} (expected [batch, seq_len, {}])",
                output.shape(),
                self.spec.dimension
            ),
        }

        Ok(embeddings)
    }

    fn encode_blocking(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let mut embeddings = self.infer(texts)?;

        if embeddings.len() != texts.len() {
            anyhow::bail!(
                "Model returned {} embeddings for {} texts",
                embeddings.len(),
                texts.len()
            );
        }
        for (i, emb) in embeddings.iter().enumerate() {
            if emb.len() != self.spec.dimension {
                anyhow::bail!(
                    "Unexpected embedding dimension at index {}: {} (expected {})",
                    i,
                    emb.len(),
                    self.spec.dimension
                );
            }
        }

        if self.spec.normalize {
            for emb in &mut embeddings {
                l2_normalize(emb);
            }
        }

        debug!("Encoded {} texts with {}", texts.len(), self.spec.name);
        Ok(embeddings)
    }

    /// Generates embeddings for multiple texts in one inference call
    ///
    /// Inference is CPU/GPU bound and runs on the blocking thread pool.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let model = self.clone();
        let texts = texts.to_vec();
        tokio::task::spawn_blocking(move || model.encode_blocking(&texts))
            .await
            .context("Embedding task panicked")?
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }
}

#[async_trait]
impl TextEmbedder for OnnxEmbeddingModel {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.embed_batch(texts).await
    }

    fn dimension(&self) -> usize {
        self.spec.dimension
    }

    fn model_name(&self) -> &str {
        self.spec.name
    }

    fn normalizes(&self) -> bool {
        self.spec.normalize
    }
}
