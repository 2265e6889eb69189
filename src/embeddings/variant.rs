// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding model catalogue
//!
//! The server ships with two sentence-embedding models. Each variant maps to a
//! static [`ModelSpec`] describing where the ONNX graph lives on the Hugging
//! Face hub and how its token-level output is turned into one vector per text.

use crate::embeddings::pooling::Pooling;
use std::fmt;
use std::str::FromStr;

/// Static description of an embedding model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    /// Name reported in logs and /health (e.g., "BAAI/bge-m3")
    pub name: &'static str,

    /// Hugging Face hub repository id
    pub repo_id: &'static str,

    /// Path of the ONNX graph inside the repository
    pub onnx_file: &'static str,

    /// Files that must sit next to the graph (external weight data)
    pub onnx_data_files: &'static [&'static str],

    /// Path of the tokenizer inside the repository
    pub tokenizer_file: &'static str,

    /// Padding token used when batching sequences of different length
    pub pad_token: &'static str,

    /// Output dimension
    pub dimension: usize,

    /// Maximum sequence length; longer inputs are truncated
    pub max_length: usize,

    /// How token embeddings are reduced to a sentence embedding
    pub pooling: Pooling,

    /// Whether sentence embeddings are scaled to unit length
    pub normalize: bool,

    /// BERT-style graphs take a third `token_type_ids` input
    pub uses_token_type_ids: bool,
}

/// BAAI/bge-m3: 1024-dim XLM-RoBERTa encoder, CLS pooling, normalized
pub const BGE_M3: ModelSpec = ModelSpec {
    name: "BAAI/bge-m3",
    repo_id: "BAAI/bge-m3",
    onnx_file: "onnx/model.onnx",
    onnx_data_files: &["onnx/model.onnx_data"],
    tokenizer_file: "tokenizer.json",
    pad_token: "<pad>",
    dimension: 1024,
    max_length: 8192,
    pooling: Pooling::Cls,
    normalize: true,
    uses_token_type_ids: false,
};

/// all-MiniLM-L6-v2: 384-dim BERT encoder, mean pooling, raw output
pub const ALL_MINILM_L6_V2: ModelSpec = ModelSpec {
    name: "all-MiniLM-L6-v2",
    repo_id: "sentence-transformers/all-MiniLM-L6-v2",
    onnx_file: "onnx/model.onnx",
    onnx_data_files: &[],
    tokenizer_file: "tokenizer.json",
    pad_token: "[PAD]",
    dimension: 384,
    max_length: 256,
    pooling: Pooling::Mean,
    normalize: false,
    uses_token_type_ids: true,
};

/// Selectable model variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelVariant {
    #[default]
    BgeM3,
    MiniLmL6V2,
}

impl ModelVariant {
    pub fn spec(self) -> ModelSpec {
        match self {
            ModelVariant::BgeM3 => BGE_M3,
            ModelVariant::MiniLmL6V2 => ALL_MINILM_L6_V2,
        }
    }

    /// Short identifier accepted on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            ModelVariant::BgeM3 => "bge-m3",
            ModelVariant::MiniLmL6V2 => "minilm",
        }
    }

    pub fn all() -> [ModelVariant; 2] {
        [ModelVariant::BgeM3, ModelVariant::MiniLmL6V2]
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bge-m3" | "bge_m3" | "baai/bge-m3" => Ok(ModelVariant::BgeM3),
            "minilm" | "all-minilm-l6-v2" | "sentence-transformers/all-minilm-l6-v2" => {
                Ok(ModelVariant::MiniLmL6V2)
            }
            other => Err(format!(
                "unknown model '{}' (expected one of: bge-m3, minilm)",
                other
            )),
        }
    }
}
