// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::api::{start_server, AppState};
use crate::config::{ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
use crate::embeddings::{
    HashEmbedder, HashEmbedderConfig, ModelVariant, OnnxEmbeddingModel, TextEmbedder,
};

/// Sentence embedding server
#[derive(Parser, Debug)]
#[command(name = "fabstir-embed-server")]
#[command(version)]
#[command(about = "Serves POST /embed backed by a pretrained sentence embedding model", long_about = None)]
pub struct Cli {
    /// Model to load (bge-m3 or minilm)
    #[arg(long, env = "EMBED_MODEL", default_value_t = ModelVariant::BgeM3)]
    pub model: ModelVariant,

    /// Interface to bind
    #[arg(long, env = "EMBED_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "EMBED_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory containing model.onnx and tokenizer.json (skips the hub download)
    #[arg(long, env = "EMBED_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Serve deterministic hash embeddings without loading a model
    #[arg(long, env = "EMBED_OFFLINE")]
    pub offline: bool,
}

impl Cli {
    pub fn into_config(self) -> Result<ServerConfig> {
        let config = ServerConfig {
            variant: self.model,
            host: self.host,
            port: self.port,
            model_dir: self.model_dir,
            offline: self.offline,
        };
        config.validate().map_err(|e| anyhow!(e))?;
        Ok(config)
    }
}

/// Builds the process-wide embedder described by `config`
pub async fn build_embedder(config: &ServerConfig) -> Result<Arc<dyn TextEmbedder>> {
    let spec = config.variant.spec();

    if config.offline {
        info!("Offline mode: serving hash embeddings shaped like {}", spec.name);
        let embedder = HashEmbedder::new(HashEmbedderConfig::for_spec(&spec))?;
        return Ok(Arc::new(embedder));
    }

    info!("🧠 Loading embedding model {}...", spec.name);
    let model = OnnxEmbeddingModel::load(config.variant, config.model_dir.as_deref()).await?;
    Ok(Arc::new(model))
}

/// Loads the model and serves until shutdown
pub async fn execute(cli: Cli) -> Result<()> {
    let config = cli.into_config()?;
    let embedder = build_embedder(&config).await?;

    info!(
        "✅ Embedding model ready: {} ({} dimensions, normalize={})",
        embedder.model_name(),
        embedder.dimension(),
        embedder.normalizes()
    );

    start_server(&config, AppState::new(embedder)).await
}
