// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbedClient against a live server on an ephemeral loopback port

use fabstir_embed_server::api::{serve, AppState};
use fabstir_embed_server::client::{ClientError, EmbedClient};
use fabstir_embed_server::embeddings::{l2_norm, HashEmbedder, HashEmbedderConfig, BGE_M3};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Starts a server backed by the hash embedder; returns the /embed URL and a stop handle
async fn spawn_server() -> (String, oneshot::Sender<()>) {
    let embedder = HashEmbedder::new(HashEmbedderConfig::for_spec(&BGE_M3)).unwrap();
    let state = AppState::new(Arc::new(embedder));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        serve(listener, state, async {
            let _ = rx.await;
        })
        .await
        .unwrap();
    });

    (format!("http://{}/embed", addr), tx)
}

#[tokio::test]
async fn test_embed_documents_round_trip() {
    let (endpoint, _stop) = spawn_server().await;
    let client = EmbedClient::new(endpoint);

    let docs = vec![
        "first chunk".to_string(),
        "second chunk".to_string(),
        "first chunk".to_string(),
    ];
    let embeddings = client.embed_documents(&docs).await.unwrap();

    assert_eq!(embeddings.len(), 3);
    assert!(embeddings.iter().all(|e| e.len() == 1024));
    assert_eq!(embeddings[0], embeddings[2]);
    assert_ne!(embeddings[0], embeddings[1]);
}

#[tokio::test]
async fn test_embed_query_returns_single_unit_vector() {
    let (endpoint, _stop) = spawn_server().await;
    let client = EmbedClient::new(endpoint);

    let embedding = client.embed_query("how do I run a retrospective?").await.unwrap();
    assert_eq!(embedding.len(), 1024);
    assert!((l2_norm(&embedding) - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn test_embed_documents_empty_list() {
    let (endpoint, _stop) = spawn_server().await;
    let client = EmbedClient::new(endpoint);

    let embeddings = client.embed_documents(&[]).await.unwrap();
    assert!(embeddings.is_empty());
}

#[tokio::test]
async fn test_large_batch_with_custom_http_client() {
    let (endpoint, _stop) = spawn_server().await;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap();
    let client = EmbedClient::with_http_client(endpoint.clone(), http);
    assert_eq!(client.endpoint(), endpoint);

    // Well over 2 MB of JSON in one request
    let docs: Vec<String> = (0..2500)
        .map(|i| format!("chunk {} {}", i, "lorem ipsum ".repeat(100)))
        .collect();
    let embeddings = client.embed_documents(&docs).await.unwrap();

    assert_eq!(embeddings.len(), 2500);
    assert!(embeddings.iter().all(|e| e.len() == 1024));
}

#[tokio::test]
async fn test_wrong_path_maps_to_status_error() {
    let (endpoint, _stop) = spawn_server().await;
    let client = EmbedClient::new(endpoint.replace("/embed", "/missing"));

    match client.embed_query("hello").await {
        Err(ClientError::Status(status)) => assert_eq!(status.as_u16(), 404),
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_clients() {
    let (endpoint, _stop) = spawn_server().await;
    let client = EmbedClient::new(endpoint);

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move { client.embed_query(&format!("query {}", i)).await })
        })
        .collect();

    for result in futures::future::join_all(tasks).await {
        let embedding = result.unwrap().unwrap();
        assert_eq!(embedding.len(), 1024);
    }
}
