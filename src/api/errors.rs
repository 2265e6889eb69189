// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

/// Body returned for every non-2xx response: `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Message returned to callers for any internal failure
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

#[derive(Debug, Clone)]
pub enum ApiError {
    /// Body is not usable JSON (bad syntax, wrong shape)
    InvalidRequest(String),
    /// Missing or wrong `Content-Type`
    UnsupportedMediaType(String),
    /// A field failed validation; only `message` is sent to the caller
    ValidationError { field: String, message: String },
    /// Body rejected by the extractor with some other status (413, 422, ...)
    Rejected { status: u16, message: String },
    /// Anything else; the detail is logged, not returned
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            ApiError::InvalidRequest(msg) | ApiError::UnsupportedMediaType(msg) => msg.clone(),
            ApiError::ValidationError { message, .. } | ApiError::Rejected { message, .. } => {
                message.clone()
            }
            ApiError::InternalError(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        };

        ErrorResponse { error: message }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) | ApiError::ValidationError { .. } => 400,
            ApiError::UnsupportedMediaType(_) => 415,
            ApiError::Rejected { status, .. } => *status,
            ApiError::InternalError(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::UnsupportedMediaType(msg) => write!(f, "Unsupported media type: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::Rejected { status, message } => {
                write!(f, "Request rejected ({}): {}", status, message)
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match rejection.status() {
            StatusCode::UNSUPPORTED_MEDIA_TYPE => ApiError::UnsupportedMediaType(message),
            StatusCode::BAD_REQUEST => ApiError::InvalidRequest(message),
            status => ApiError::Rejected {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(format!("{:#}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::InternalError(detail) = &self {
            error!("Request failed: {}", detail);
        }

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}
