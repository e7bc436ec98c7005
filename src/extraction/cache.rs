// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-call page cache
//!
//! Lives for one `extract` call so a URL named by several fields is fetched
//! once. Failures are remembered as well: a URL is never retried inside the
//! same call.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use super::fetcher::{DocumentFetcher, FetchError, FetchedPage};

/// Cache statistics for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCacheStats {
    /// Distinct URLs fetched or stored
    pub fetches: usize,
    /// Lookups answered from the cache
    pub hits: usize,
    /// Cached failures
    pub failures: usize,
}

/// URL-keyed cache of fetch outcomes
#[derive(Default)]
pub struct PageCache {
    pages: HashMap<String, Result<Arc<FetchedPage>, FetchError>>,
    hits: usize,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a page fetched outside the cache
    pub fn insert(&mut self, page: FetchedPage) -> Arc<FetchedPage> {
        let page = Arc::new(page);
        self.pages
            .insert(Self::normalize_url(&page.url), Ok(page.clone()));
        page
    }

    /// Return the cached outcome for `url`, fetching it on first use
    pub async fn get_or_fetch(
        &mut self,
        fetcher: &dyn DocumentFetcher,
        url: &str,
    ) -> Result<Arc<FetchedPage>, FetchError> {
        let key = Self::normalize_url(url);
        if let Some(cached) = self.pages.get(&key) {
            debug!("Page cache hit for: {}", url);
            self.hits += 1;
            return cached.clone();
        }

        let outcome = fetcher.fetch(url).await.map(Arc::new);
        self.pages.insert(key, outcome.clone());
        outcome
    }

    pub fn stats(&self) -> PageCacheStats {
        PageCacheStats {
            fetches: self.pages.len(),
            hits: self.hits,
            failures: self.pages.values().filter(|p| p.is_err()).count(),
        }
    }

    /// Normalize URL for cache key (lowercase scheme and host, remove trailing slash)
    fn normalize_url(url: &str) -> String {
        let url = url.trim();
        let normalized = Url::parse(url)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| url.to_string());
        normalized.trim_end_matches('/').to_string()
    }
}
