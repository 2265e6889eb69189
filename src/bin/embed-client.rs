// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use fabstir_embed_server::client::{EmbedClient, DEFAULT_ENDPOINT};
use std::time::Duration;

/// Sends texts to a running embedding server and prints the vectors as JSON
#[derive(Parser, Debug)]
#[command(name = "embed-client")]
#[command(version)]
#[command(about = "Query a Fabstir embedding server", long_about = None)]
struct Args {
    /// Embedding endpoint
    #[arg(long, env = "EMBED_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Request timeout in seconds
    #[arg(long, env = "EMBED_TIMEOUT_SECS", default_value_t = 60)]
    timeout_secs: u64,

    /// Texts to embed
    #[arg(required = true)]
    texts: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;
    let client = EmbedClient::with_http_client(args.endpoint, http);

    match client.embed_documents(&args.texts).await {
        Ok(embeddings) => {
            println!("{}", serde_json::json!({ "embeddings": embeddings }));
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}
