// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model file resolution
//!
//! Model files come either from a local directory laid out like
//! `./models/all-MiniLM-L6-v2-onnx/{model.onnx,tokenizer.json}` or from the
//! Hugging Face hub, in which case `hf-hub` downloads them once into its
//! on-disk cache and returns the cached paths on later runs.

use crate::embeddings::ModelSpec;
use anyhow::{Context, Result};
use hf_hub::api::sync::Api;
use std::path::{Path, PathBuf};
use tracing::info;

/// Resolved on-disk locations of a model's files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
}

fn file_name(repo_path: &str) -> &str {
    repo_path.rsplit('/').next().unwrap_or(repo_path)
}

/// Looks up model files in a flat local directory
pub fn resolve_local(dir: &Path, spec: &ModelSpec) -> Result<ModelFiles> {
    let model_path = dir.join(file_name(spec.onnx_file));
    let tokenizer_path = dir.join(file_name(spec.tokenizer_file));

    if !model_path.exists() {
        anyhow::bail!("ONNX model file not found: {}", model_path.display());
    }
    if !tokenizer_path.exists() {
        anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
    }
    for data_file in spec.onnx_data_files {
        let data_path = dir.join(file_name(data_file));
        if !data_path.exists() {
            anyhow::bail!("ONNX external data file not found: {}", data_path.display());
        }
    }

    Ok(ModelFiles {
        model_path,
        tokenizer_path,
    })
}

/// Downloads (or reuses cached) model files from the Hugging Face hub
///
/// The sync hub client blocks, so the download runs on the blocking pool.
pub async fn fetch_from_hub(spec: ModelSpec) -> Result<ModelFiles> {
    tokio::task::spawn_blocking(move || {
        info!("Fetching {} from Hugging Face hub ({})", spec.name, spec.repo_id);

        let api = Api::new().context("Failed to create Hugging Face hub client")?;
        let repo = api.model(spec.repo_id.to_string());

        let model_path = repo
            .get(spec.onnx_file)
            .with_context(|| format!("Failed to fetch {} from {}", spec.onnx_file, spec.repo_id))?;
        // External weights must land next to the graph; the hub cache mirrors repo layout
        for data_file in spec.onnx_data_files {
            repo.get(data_file)
                .with_context(|| format!("Failed to fetch {} from {}", data_file, spec.repo_id))?;
        }
        let tokenizer_path = repo.get(spec.tokenizer_file).with_context(|| {
            format!("Failed to fetch {} from {}", spec.tokenizer_file, spec.repo_id)
        })?;

        info!("✓ Model files available at {}", model_path.display());
        Ok(ModelFiles {
            model_path,
            tokenizer_path,
        })
    })
    .await
    .context("Model download task panicked")?
}

/// Resolves model files from `model_dir` when given, otherwise from the hub
pub async fn resolve_model_files(spec: ModelSpec, model_dir: Option<&Path>) -> Result<ModelFiles> {
    match model_dir {
        Some(dir) => resolve_local(dir, &spec),
        None => fetch_from_hub(spec).await,
    }
}
