// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Queryable document tree
//!
//! Thin capability layer over `scraper`: select one node, select all nodes,
//! read a node's text. Selector evaluation reports parse failures as
//! [`SelectorError`] so callers can decide how to degrade.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// A selector string could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid selector '{selector}': {reason}")]
pub struct SelectorError {
    pub selector: String,
    pub reason: String,
}

/// Parse a CSS selector
pub fn parse_selector(selector: &str) -> Result<Selector, SelectorError> {
    Selector::parse(selector).map_err(|e| SelectorError {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}

/// Immutable parsed page
///
/// Not `Send`: parse, query and drop it without crossing an `.await`.
pub struct Document {
    url: String,
    html: Html,
}

impl Document {
    /// Parse a page body fetched from `url`
    pub fn parse(url: &str, body: &str) -> Self {
        Self {
            url: url.to_string(),
            html: Html::parse_document(body),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// First node matching `selector`, in document order
    pub fn select_one(&self, selector: &str) -> Result<Option<ElementRef<'_>>, SelectorError> {
        let selector = parse_selector(selector)?;
        Ok(self.html.select(&selector).next())
    }

    /// Every node matching `selector`, in document order
    pub fn select_all(&self, selector: &str) -> Result<Vec<ElementRef<'_>>, SelectorError> {
        let selector = parse_selector(selector)?;
        Ok(self.html.select(&selector).collect())
    }
}

/// First node under `scope` matching `selector`
pub fn select_one_within<'a>(
    scope: ElementRef<'a>,
    selector: &str,
) -> Result<Option<ElementRef<'a>>, SelectorError> {
    let selector = parse_selector(selector)?;
    let found = scope.select(&selector).next();
    Ok(found)
}

/// Every node under `scope` matching `selector`
pub fn select_all_within<'a>(
    scope: ElementRef<'a>,
    selector: &str,
) -> Result<Vec<ElementRef<'a>>, SelectorError> {
    let selector = parse_selector(selector)?;
    let found = scope.select(&selector).collect();
    Ok(found)
}

/// Trimmed text of a node with inner whitespace runs collapsed to one space
pub fn text(element: ElementRef<'_>) -> String {
    collapse_whitespace(element.text())
}

fn collapse_whitespace<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for word in pieces.flat_map(str::split_whitespace) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
