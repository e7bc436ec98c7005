// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Extraction service orchestration
//!
//! Looks up the rule set for a URL, fetches the documents each field needs and
//! resolves every field's primary rule, falling back when the primary value is
//! empty.

use indexmap::IndexMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::cache::PageCache;
use super::document::Document;
use super::fetcher::DocumentFetcher;
use super::registry::{source_key, RuleRegistry};
use super::resolver::resolve;
use super::rules::{DocumentSource, ExtractorSpec, RuleSet};
use super::types::{ExtractionError, ExtractionResult, FieldValue};

/// Main extraction service: registry lookup, fetching and field resolution
pub struct ExtractionService {
    registry: Arc<RuleRegistry>,
    fetcher: Arc<dyn DocumentFetcher>,
}

impl ExtractionService {
    pub fn new(registry: Arc<RuleRegistry>, fetcher: Arc<dyn DocumentFetcher>) -> Self {
        Self { registry, fetcher }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Extract a record from `url`
    ///
    /// # Errors
    /// - `NotConfigured` when no rule set exists for the URL's source key
    /// - `Fetch` when the requested document itself cannot be fetched
    ///
    /// Every other problem leaves the affected field `null`.
    pub async fn extract(&self, url: &str) -> Result<ExtractionResult, ExtractionError> {
        let key = source_key(url);
        let rules = self.registry.lookup(&key)?;

        let start = Instant::now();
        let mut pages = PageCache::new();
        let page = self.fetcher.fetch(url).await?;
        let page = pages.insert(page);

        // Html is not Send, so same-document rules are resolved before any
        // further fetch is awaited.
        let mut resolved = resolve_same_document(url, &page.body, rules);

        let mut result = ExtractionResult::new(url);
        for (field, rule) in rules {
            let primary = match resolved.swap_remove(field.as_str()) {
                Some(value) => value,
                None => self.resolve_spec(&rule.primary, url, &mut pages).await,
            };

            let value = match &rule.fallback {
                Some(fallback) if primary.is_empty() => {
                    debug!("Field '{}' empty on primary rule, trying fallback", field);
                    self.resolve_spec(fallback, url, &mut pages).await
                }
                _ => primary,
            };

            result.fields.insert(field.clone(), value);
        }

        let stats = pages.stats();
        info!(
            "Extracted {}/{} fields for {} in {}ms ({} documents, {} failed, {} cache hits)",
            result.present_count(),
            result.fields.len(),
            key,
            start.elapsed().as_millis(),
            stats.fetches,
            stats.failures,
            stats.hits
        );

        Ok(result)
    }

    /// Fetch the document `spec` names and resolve it.
    /// A failed fetch yields `Null`.
    async fn resolve_spec(
        &self,
        spec: &ExtractorSpec,
        request_url: &str,
        pages: &mut PageCache,
    ) -> FieldValue {
        let url = match &spec.source {
            DocumentSource::Same => request_url,
            DocumentSource::External(url) => url.as_str(),
        };

        match pages.get_or_fetch(self.fetcher.as_ref(), url).await {
            Ok(page) => resolve_body(url, &page.body, spec),
            Err(e) => {
                warn!("Fetch for {} rule failed, field left null: {}", spec.extractor.kind(), e);
                FieldValue::Null
            }
        }
    }
}

fn resolve_body(url: &str, body: &str, spec: &ExtractorSpec) -> FieldValue {
    let document = Document::parse(url, body);
    resolve(&document, &spec.extractor)
}

/// Resolve every primary rule that reads the requested document
fn resolve_same_document<'r>(
    url: &str,
    body: &str,
    rules: &'r RuleSet,
) -> IndexMap<&'r str, FieldValue> {
    let document = Document::parse(url, body);
    rules
        .iter()
        .filter(|(_, rule)| rule.primary.source == DocumentSource::Same)
        .map(|(field, rule)| (field.as_str(), resolve(&document, &rule.primary.extractor)))
        .collect()
}
