// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use fabstir_embed_server::cli::{execute, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // RUST_LOG overrides; info by default
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🚀 Starting Fabstir Embedding Server...\n");
    println!("📦 BUILD VERSION: {}", fabstir_embed_server::version::VERSION);
    println!("📅 Build Date: {}", fabstir_embed_server::version::BUILD_DATE);
    println!("🧩 Features: {}", fabstir_embed_server::version::FEATURES.join(", "));
    println!();

    match execute(cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
