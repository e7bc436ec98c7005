// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Field resolver
//!
//! Evaluates one [`Extractor`] against one [`Document`]. Resolution is total:
//! a selector that cannot be evaluated behaves exactly like a selector that
//! matches nothing.

use tracing::debug;

use super::document::{self, Document, SelectorError};
use super::rules::{BlockSection, BlocksSpec, Extractor};
use super::types::{FieldValue, LabeledBlock};

/// Resolve `extractor` against `document`
pub fn resolve(document: &Document, extractor: &Extractor) -> FieldValue {
    let outcome = match extractor {
        Extractor::Single { selector } => resolve_single(document, selector),
        Extractor::ByLabel {
            container_selector,
            label,
            label_selector,
            value_selector,
        } => resolve_by_label(
            document,
            container_selector,
            label,
            label_selector,
            value_selector.as_deref(),
        ),
        Extractor::Table {
            selector,
            row_selector,
            cell_selector,
        } => resolve_table(document, selector, row_selector, cell_selector),
        Extractor::Blocks(BlocksSpec::Plain { selector }) => resolve_blocks(document, selector),
        Extractor::Blocks(BlocksSpec::Filtered { sections }) => {
            Ok(resolve_sections(document, sections))
        }
    };

    outcome.unwrap_or_else(|e| {
        debug!(
            "{} extractor on {} treated as no match: {}",
            extractor.kind(),
            document.url(),
            e
        );
        no_match(extractor)
    })
}

/// The value a variant yields when nothing matches
fn no_match(extractor: &Extractor) -> FieldValue {
    match extractor {
        Extractor::Single { .. } | Extractor::ByLabel { .. } | Extractor::Table { .. } => {
            FieldValue::Null
        }
        Extractor::Blocks(BlocksSpec::Plain { .. }) => FieldValue::Blocks(Vec::new()),
        Extractor::Blocks(BlocksSpec::Filtered { .. }) => FieldValue::LabeledBlocks(Vec::new()),
    }
}

fn resolve_single(document: &Document, selector: &str) -> Result<FieldValue, SelectorError> {
    Ok(document
        .select_one(selector)?
        .map(|el| FieldValue::Text(document::text(el)))
        .unwrap_or(FieldValue::Null))
}

fn resolve_by_label(
    document: &Document,
    container_selector: &str,
    label: &str,
    label_selector: &str,
    value_selector: Option<&str>,
) -> Result<FieldValue, SelectorError> {
    for container in document.select_all(container_selector)? {
        let heading = match document::select_one_within(container, label_selector)? {
            Some(h) => h,
            None => continue,
        };
        if document::text(heading) != label {
            continue;
        }

        return Ok(match value_selector {
            None => FieldValue::Text(document::text(container)),
            Some(value_selector) => document::select_one_within(container, value_selector)?
                .map(|el| FieldValue::Text(document::text(el)))
                .unwrap_or(FieldValue::Null),
        });
    }
    Ok(FieldValue::Null)
}

fn resolve_table(
    document: &Document,
    selector: &str,
    row_selector: &str,
    cell_selector: &str,
) -> Result<FieldValue, SelectorError> {
    let table = match document.select_one(selector)? {
        Some(t) => t,
        None => return Ok(FieldValue::Null),
    };

    let mut rows = Vec::new();
    for row in document::select_all_within(table, row_selector)? {
        let cells = document::select_all_within(row, cell_selector)?
            .into_iter()
            .map(document::text)
            .collect();
        rows.push(cells);
    }
    Ok(FieldValue::Table(rows))
}

fn resolve_blocks(document: &Document, selector: &str) -> Result<FieldValue, SelectorError> {
    let blocks = document
        .select_all(selector)?
        .into_iter()
        .map(document::text)
        .filter(|t| !t.is_empty())
        .collect();
    Ok(FieldValue::Blocks(blocks))
}

/// Sections are independent: a section whose selector fails is skipped.
fn resolve_sections(document: &Document, sections: &[BlockSection]) -> FieldValue {
    let mut blocks = Vec::new();
    for section in sections {
        let candidates = match document.select_all(&section.selector) {
            Ok(c) => c,
            Err(e) => {
                debug!("Skipping section '{}': {}", section.level, e);
                continue;
            }
        };
        let required: Vec<String> = section.contains.iter().map(|s| s.to_lowercase()).collect();

        for candidate in candidates {
            let text = document::text(candidate);
            if text.is_empty() {
                continue;
            }
            let lowered = text.to_lowercase();
            if required.iter().all(|needle| lowered.contains(needle.as_str())) {
                blocks.push(LabeledBlock {
                    level: section.level.clone(),
                    text,
                });
            }
        }
    }
    FieldValue::LabeledBlocks(blocks)
}
