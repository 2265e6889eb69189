// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server configuration

use crate::embeddings::ModelVariant;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8081;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Which model to load at startup
    pub variant: ModelVariant,
    /// Interface to bind (loopback by default)
    pub host: String,
    pub port: u16,
    /// Local directory with model.onnx + tokenizer.json; hub cache when `None`
    pub model_dir: Option<PathBuf>,
    /// Serve deterministic hash embeddings instead of loading a model
    pub offline: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            variant: ModelVariant::default(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_dir: None,
            offline: false,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }
        if self.port == 0 {
            return Err("Port must be greater than 0".to_string());
        }
        if let Some(dir) = &self.model_dir {
            if !dir.is_dir() {
                return Err(format!("Model directory does not exist: {}", dir.display()));
            }
        }
        Ok(())
    }
}
