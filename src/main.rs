// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use fabstir_course_extractor::{
    api::{start_server, ApiConfig, AppState},
    extraction::{load_rule_registry, ExtractionService, ExtractorConfig, HttpFetcher},
    version,
};
use std::{env, sync::Arc};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting {}...\n", version::get_version_string());
    println!("📦 BUILD VERSION: {}", version::VERSION);
    println!("🧩 Features: {}", version::FEATURES.join(", "));
    println!();

    let extractor_config = ExtractorConfig::from_env();
    extractor_config
        .validate()
        .map_err(|e| anyhow!("Invalid extractor configuration: {}", e))?;

    println!("📚 Loading rules from {}...", extractor_config.rules_path.display());
    let registry = load_rule_registry(&extractor_config.rules_path).with_context(|| {
        format!(
            "Failed to load rules from {}",
            extractor_config.rules_path.display()
        )
    })?;
    println!("✅ {} sources configured", registry.len());

    let fetcher = HttpFetcher::new(&extractor_config)?;
    let service = ExtractionService::new(Arc::new(registry), Arc::new(fetcher));

    let api_config = ApiConfig::from_env();
    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!("Listening on:   {}:{}", api_config.host, api_config.port);
    println!("Fetch timeout:  {}s", extractor_config.fetch_timeout_secs);
    println!("\nAPI Endpoints:");
    println!("  Health:       http://localhost:{}/health", api_config.port);
    println!("  Sources:      http://localhost:{}/v1/sources", api_config.port);
    println!("  Extract:      POST http://localhost:{}/extract", api_config.port);
    println!("\nTest with curl:");
    println!("  curl -X POST http://localhost:{}/extract \\", api_config.port);
    println!("    -H 'Content-Type: application/json' \\");
    println!("    -d '{{\"course_url\": \"https://www.example.ac.uk/courses/physics\"}}'");
    println!("\nPress Ctrl+C to shutdown...");
    println!("{}\n", separator);

    let state = AppState::new(service);
    tokio::select! {
        result = start_server(api_config, state) => {
            result.map_err(|e| anyhow!("API server error: {}", e))?;
        }
        _ = signal::ctrl_c() => {
            println!("\n⏹️  Shutting down...");
        }
    }

    println!("👋 Goodbye!");
    Ok(())
}
