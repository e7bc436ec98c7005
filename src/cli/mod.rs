// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::extraction::{
    load_rule_registry, ExtractionService, ExtractorConfig, HttpFetcher, RuleRegistry,
};

/// Fabstir Course Extractor CLI
#[derive(Parser, Debug)]
#[command(name = "extract-cli")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "CLI tools for checking extraction rules and running extractions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a rule file and report its sources and unusable selectors
    Check(CheckArgs),

    /// Extract one course page and print the record as JSON
    Extract(ExtractArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Rule file (.json or .toml)
    #[arg(long, env = "SELECTORS_PATH", default_value = "selectors.json")]
    pub rules: PathBuf,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Rule file (.json or .toml)
    #[arg(long, env = "SELECTORS_PATH", default_value = "selectors.json")]
    pub rules: PathBuf,

    /// Course page URL
    pub url: String,

    /// Print compact JSON instead of pretty JSON
    #[arg(long)]
    pub compact: bool,
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check(args) => check_rules(args),
        Commands::Extract(args) => extract_url(args).await,
    }
}

fn load(path: &PathBuf) -> Result<RuleRegistry> {
    load_rule_registry(path).with_context(|| format!("Failed to load rules from {}", path.display()))
}

/// Human-readable summary of a registry
pub fn describe_registry(registry: &RuleRegistry) -> Vec<String> {
    let mut lines = Vec::new();
    for key in registry.source_keys() {
        let rules = match registry.get(key) {
            Some(r) => r,
            None => continue,
        };
        let fallbacks = rules.values().filter(|r| r.fallback.is_some()).count();
        lines.push(format!(
            "{}: {} fields ({} with fallback)",
            key,
            rules.len(),
            fallbacks
        ));
    }
    for w in registry.selector_warnings() {
        lines.push(format!(
            "warning: {}.{} selector '{}' will never match ({})",
            w.source_key, w.field, w.selector, w.reason
        ));
    }
    lines
}

fn check_rules(args: CheckArgs) -> Result<()> {
    let registry = load(&args.rules)?;
    println!("✅ {} sources in {}", registry.len(), args.rules.display());
    for line in describe_registry(&registry) {
        println!("   {}", line);
    }
    Ok(())
}

async fn extract_url(args: ExtractArgs) -> Result<()> {
    let config = ExtractorConfig::from_env();
    config.validate().map_err(anyhow::Error::msg)?;

    let registry = Arc::new(load(&args.rules)?);
    let fetcher = Arc::new(HttpFetcher::new(&config)?);
    let service = ExtractionService::new(registry, fetcher);

    let record = service.extract(&args.url).await?;
    let json = if args.compact {
        serde_json::to_string(&record)?
    } else {
        serde_json::to_string_pretty(&record)?
    };
    println!("{}", json);
    Ok(())
}
