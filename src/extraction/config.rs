// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for rule loading and document fetching

use std::env;
use std::path::PathBuf;

/// Configuration for the extraction service
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Path of the rule file (default: selectors.json)
    pub rules_path: PathBuf,
    /// Timeout per document fetch in seconds (default: 20)
    pub fetch_timeout_secs: u64,
    /// User-Agent header sent with every fetch (default: Mozilla/5.0)
    pub user_agent: String,
    /// Maximum redirects followed per fetch (default: 5)
    pub max_redirects: usize,
    /// Allow fetching loopback and private hosts (default: false)
    pub allow_private_hosts: bool,
}

impl ExtractorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            rules_path: env::var("SELECTORS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.rules_path),
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_timeout_secs),
            user_agent: env::var("FETCH_USER_AGENT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.user_agent),
            max_redirects: env::var("FETCH_MAX_REDIRECTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_redirects)
                .min(10), // Cap at 10
            allow_private_hosts: env::var("FETCH_ALLOW_PRIVATE_HOSTS")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(defaults.allow_private_hosts),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be at least 1".to_string());
        }
        if self.user_agent.trim().is_empty() {
            return Err("user_agent cannot be empty".to_string());
        }
        if self.rules_path.as_os_str().is_empty() {
            return Err("rules_path cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from("selectors.json"),
            fetch_timeout_secs: 20,
            user_agent: "Mozilla/5.0".to_string(),
            max_redirects: 5,
            allow_private_hosts: false,
        }
    }
}
