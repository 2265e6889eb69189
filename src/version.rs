// Version information for the Fabstir embedding server

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-sentence-embeddings-2025-10-20";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2025-10-20";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "bge-m3",
    "all-minilm-l6-v2",
    "l2-normalization",
    "cuda-fallback",
    "hf-hub-cache",
];
