// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Rule registry keyed by normalized source host
//!
//! Loaded once at process start and shared read-only afterwards.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};
use url::Url;

use super::document::parse_selector;
use super::rules::{ConfigError, RuleSet};
use super::types::ExtractionError;

/// Normalize a URL to the key used for rule lookup.
///
/// Lowercased host with one leading `www.` removed. Returns an empty string
/// when no host can be extracted; that key never matches a registry entry.
pub fn source_key(url: &str) -> String {
    let host = match Url::parse(url.trim()) {
        Ok(parsed) => parsed.host_str().map(str::to_lowercase),
        Err(_) => None,
    };
    match host {
        Some(host) => normalize_host(&host),
        None => String::new(),
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().to_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

/// A selector in the registry that will never match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorWarning {
    pub source_key: String,
    pub field: String,
    pub selector: String,
    pub reason: String,
}

/// Immutable mapping from source key to rule set
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    sources: HashMap<String, RuleSet>,
}

impl RuleRegistry {
    /// Build a registry from already-parsed rule sets
    pub fn from_sources(sources: IndexMap<String, RuleSet>) -> Result<Self, ConfigError> {
        let mut map = HashMap::with_capacity(sources.len());
        for (key, rules) in sources {
            let key = normalize_host(&key);
            for (field, rule) in &rules {
                rule.validate(field).map_err(|e| ConfigError::InField {
                    source_key: key.clone(),
                    field: field.clone(),
                    error: Box::new(e),
                })?;
            }
            if map.contains_key(&key) {
                return Err(ConfigError::DuplicateSource { source_key: key });
            }
            map.insert(key, rules);
        }
        Ok(Self { sources: map })
    }

    /// Parse a JSON rule document
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let sources: IndexMap<String, RuleSet> = serde_json::from_str(content)?;
        Self::from_sources(sources)
    }

    /// Parse a TOML rule document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let sources: IndexMap<String, RuleSet> = toml::from_str(content)?;
        Self::from_sources(sources)
    }

    /// Rule set for a source key
    pub fn lookup(&self, source_key: &str) -> Result<&RuleSet, ExtractionError> {
        self.sources
            .get(source_key)
            .ok_or_else(|| ExtractionError::NotConfigured {
                source_key: source_key.to_string(),
            })
    }

    pub fn get(&self, source_key: &str) -> Option<&RuleSet> {
        self.sources.get(source_key)
    }

    /// Configured source keys, sorted
    pub fn source_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Every selector that fails to parse, sorted by source and field
    pub fn selector_warnings(&self) -> Vec<SelectorWarning> {
        let mut warnings = Vec::new();
        for key in self.source_keys() {
            let rules = &self.sources[key];
            for (field, rule) in rules {
                let specs = std::iter::once(&rule.primary).chain(rule.fallback.as_ref());
                for spec in specs {
                    for selector in spec.extractor.selectors() {
                        if let Err(e) = parse_selector(selector) {
                            warnings.push(SelectorWarning {
                                source_key: key.to_string(),
                                field: field.clone(),
                                selector: selector.to_string(),
                                reason: e.reason,
                            });
                        }
                    }
                }
            }
        }
        warnings
    }
}

/// Load the rule registry from a file. `.toml` files are read as TOML,
/// anything else as JSON.
pub fn load_rule_registry(path: impl AsRef<Path>) -> Result<RuleRegistry, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let is_toml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);
    let registry = if is_toml {
        RuleRegistry::from_toml_str(&content)?
    } else {
        RuleRegistry::from_json_str(&content)?
    };

    for w in registry.selector_warnings() {
        warn!(
            "Selector for {}.{} will never match: '{}' ({})",
            w.source_key, w.field, w.selector, w.reason
        );
    }
    info!(
        "Loaded {} rule sets from {}",
        registry.len(),
        path.display()
    );

    Ok(registry)
}
