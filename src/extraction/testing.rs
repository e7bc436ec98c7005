// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-memory fetcher for tests and offline runs
//!
//! Serves fixed pages by URL and records every request so callers can
//! assert which documents were fetched.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::fetcher::{DocumentFetcher, FetchError, FetchedPage};

/// Fetcher that answers from a fixed set of pages
#[derive(Default, Clone)]
pub struct StaticFetcher {
    pages: Arc<RwLock<HashMap<String, Result<String, FetchError>>>>,
    requests: Arc<RwLock<Vec<String>>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`
    pub fn with_page(self, url: &str, body: &str) -> Self {
        if let Ok(mut pages) = self.pages.write() {
            pages.insert(url.to_string(), Ok(body.to_string()));
        }
        self
    }

    /// Fail every fetch of `url` with `error`
    pub fn with_error(self, url: &str, error: FetchError) -> Self {
        if let Ok(mut pages) = self.pages.write() {
            pages.insert(url.to_string(), Err(error));
        }
        self
    }

    /// Every URL requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .read()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// How many times `url` was requested
    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| u.as_str() == url).count()
    }
}

#[async_trait]
impl DocumentFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        if let Ok(mut requests) = self.requests.write() {
            requests.push(url.to_string());
        }

        let outcome = self
            .pages
            .read()
            .ok()
            .and_then(|pages| pages.get(url).cloned());

        match outcome {
            Some(Ok(body)) => Ok(FetchedPage {
                url: url.to_string(),
                body,
            }),
            Some(Err(e)) => Err(e),
            None => Err(FetchError::HttpStatus(404, url.to_string())),
        }
    }
}
