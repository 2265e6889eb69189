// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding API Module
//!
//! This module provides the POST /embed endpoint, which turns a list of
//! strings into a list of sentence embeddings using the loaded model.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::embed_handler;
pub use request::{EmbedRequest, TEXTS_MUST_BE_A_LIST};
pub use response::EmbedResponse;
