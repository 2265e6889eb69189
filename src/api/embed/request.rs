// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbedRequest type for POST /embed
//!
//! The body is taken as raw JSON and validated by hand so that a wrong
//! `texts` type yields the documented 400 message instead of a generic
//! deserialization rejection.

use crate::api::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error message for a `texts` field that is not a list of strings
pub const TEXTS_MUST_BE_A_LIST: &str = "texts must be a list";

/// Request body for POST /embed
///
/// # Example
/// ```json
/// {
///   "texts": ["Hello world", "Another text"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedRequest {
    /// Texts to embed; absent means empty
    #[serde(default)]
    pub texts: Vec<String>,
}

fn texts_error() -> ApiError {
    ApiError::ValidationError {
        field: "texts".to_string(),
        message: TEXTS_MUST_BE_A_LIST.to_string(),
    }
}

impl EmbedRequest {
    pub fn new(texts: Vec<String>) -> Self {
        Self { texts }
    }

    /// Builds a request from an arbitrary JSON body
    ///
    /// # Validation Rules
    /// 1. The body must be a JSON object
    /// 2. `texts` absent → empty list
    /// 3. `texts` present → must be an array whose items are all strings
    pub fn from_value(body: Value) -> Result<Self, ApiError> {
        let mut object = match body {
            Value::Object(object) => object,
            _ => {
                return Err(ApiError::InvalidRequest(
                    "request body must be a JSON object".to_string(),
                ))
            }
        };

        let texts = match object.remove("texts") {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(text) => Ok(text),
                    _ => Err(texts_error()),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(texts_error()),
        };

        Ok(Self { texts })
    }
}

impl TryFrom<Value> for EmbedRequest {
    type Error = ApiError;

    fn try_from(body: Value) -> Result<Self, Self::Error> {
        Self::from_value(body)
    }
}
