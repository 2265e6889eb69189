// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed endpoint tests
//!
//! Drives the full router with `oneshot`, backed by the deterministic hash
//! embedder so no model files are needed.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fabstir_embed_server::api::{create_app, AppState};
use fabstir_embed_server::embeddings::{
    l2_norm, HashEmbedder, HashEmbedderConfig, ALL_MINILM_L6_V2, BGE_M3,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

fn app_for(config: HashEmbedderConfig) -> Router {
    let embedder = HashEmbedder::new(config).expect("valid embedder config");
    create_app(AppState::new(Arc::new(embedder)))
}

fn normalizing_app() -> Router {
    app_for(HashEmbedderConfig::for_spec(&BGE_M3))
}

fn raw_app() -> Router {
    app_for(HashEmbedderConfig::for_spec(&ALL_MINILM_L6_V2))
}

async fn post_json(app: Router, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/embed")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);
    (status, json)
}

fn vectors(body: &Value) -> Vec<Vec<f32>> {
    serde_json::from_value(body["embeddings"].clone()).expect("embeddings array")
}

#[cfg(test)]
mod embed_endpoint_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_texts_returns_empty_embeddings() {
        let (status, body) = post_json(normalizing_app(), "{}").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"embeddings": []}));
    }

    #[tokio::test]
    async fn test_empty_texts_returns_empty_embeddings() {
        let (status, body) = post_json(normalizing_app(), r#"{"texts": []}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"embeddings": []}));
    }

    #[tokio::test]
    async fn test_number_texts_is_rejected() {
        let (status, body) = post_json(normalizing_app(), r#"{"texts": 42}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "texts must be a list"}));
    }

    #[tokio::test]
    async fn test_object_texts_is_rejected() {
        let (status, body) = post_json(normalizing_app(), r#"{"texts": {"a": "b"}}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "texts must be a list");
    }

    #[tokio::test]
    async fn test_string_and_null_texts_are_rejected() {
        for body in [r#"{"texts": "hello"}"#, r#"{"texts": null}"#] {
            let (status, json) = post_json(raw_app(), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
            assert_eq!(json["error"], "texts must be a list");
        }
    }

    #[tokio::test]
    async fn test_non_string_items_are_rejected() {
        let (status, body) = post_json(raw_app(), r#"{"texts": ["ok", 7]}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "texts must be a list");
    }

    #[tokio::test]
    async fn test_three_texts_give_three_vectors_in_order() {
        let (status, body) = post_json(normalizing_app(), r#"{"texts": ["a", "b", "c"]}"#).await;
        assert_eq!(status, StatusCode::OK);

        let embeddings = vectors(&body);
        assert_eq!(embeddings.len(), 3);
        assert!(embeddings.iter().all(|e| e.len() == 1024));

        // Order check: each position matches a single-text request for the same input
        for (i, text) in ["a", "b", "c"].iter().enumerate() {
            let (_, single) =
                post_json(normalizing_app(), &json!({"texts": [text]}).to_string()).await;
            assert_eq!(vectors(&single)[0], embeddings[i]);
        }
    }

    #[tokio::test]
    async fn test_normalizing_variant_returns_unit_vectors() {
        let (status, body) =
            post_json(normalizing_app(), r#"{"texts": ["hello", "world", "unit"]}"#).await;
        assert_eq!(status, StatusCode::OK);

        for embedding in vectors(&body) {
            assert!(
                (l2_norm(&embedding) - 1.0).abs() < 1e-4,
                "norm was {}",
                l2_norm(&embedding)
            );
        }
    }

    #[tokio::test]
    async fn test_raw_variant_is_not_norm_constrained() {
        let (status, body) = post_json(raw_app(), r#"{"texts": ["hello", "world"]}"#).await;
        assert_eq!(status, StatusCode::OK);

        let embeddings = vectors(&body);
        assert!(embeddings.iter().all(|e| e.len() == 384));
        assert!(embeddings
            .iter()
            .any(|e| (l2_norm(e) - 1.0).abs() > 1e-3));
    }

    #[tokio::test]
    async fn test_same_text_twice_gives_identical_vectors() {
        let (status, body) = post_json(raw_app(), r#"{"texts": ["repeat", "repeat"]}"#).await;
        assert_eq!(status, StatusCode::OK);

        let embeddings = vectors(&body);
        assert_eq!(embeddings[0], embeddings[1]);
    }

    #[tokio::test]
    async fn test_empty_string_gives_one_vector() {
        let (status, body) = post_json(normalizing_app(), r#"{"texts": [""]}"#).await;

        assert_eq!(status, StatusCode::OK);
        let embeddings = vectors(&body);
        assert_eq!(embeddings.len(), 1);
        assert_eq!(embeddings[0].len(), 1024);
    }

    #[tokio::test]
    async fn test_malformed_json_is_client_error() {
        let (status, body) = post_json(normalizing_app(), "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_non_object_body_is_rejected() {
        let (status, body) = post_json(normalizing_app(), r#"["a", "b"]"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "request body must be a JSON object");
    }

    #[tokio::test]
    async fn test_missing_content_type_is_rejected() {
        let req = Request::builder()
            .method("POST")
            .uri("/embed")
            .body(Body::from(r#"{"texts": ["a"]}"#))
            .unwrap();

        let response = normalizing_app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_large_body_is_accepted() {
        // ~3 MB, above axum's default 2 MB extractor limit
        let texts: Vec<String> = (0..3000)
            .map(|i| format!("{:04}{}", i, "x".repeat(1020)))
            .collect();
        let body = json!({ "texts": texts }).to_string();
        assert!(body.len() > 2 * 1024 * 1024);

        let (status, json) = post_json(raw_app(), &body).await;
        assert_eq!(status, StatusCode::OK);

        let embeddings = vectors(&json);
        assert_eq!(embeddings.len(), 3000);
        assert!(embeddings.iter().all(|e| e.len() == 384));
    }

    #[tokio::test]
    async fn test_get_is_not_allowed() {
        let req = Request::builder()
            .method("GET")
            .uri("/embed")
            .body(Body::empty())
            .unwrap();

        let response = normalizing_app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
