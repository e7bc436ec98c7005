// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for rule-driven extraction

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use super::fetcher::FetchError;

/// Key under which the requested URL is stored in every record
pub const COURSE_URL_KEY: &str = "course_url";

/// A block of text tagged with the section it was collected under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledBlock {
    /// Name of the section that matched
    pub level: String,
    /// Collapsed text of the block
    pub text: String,
}

/// Value produced by resolving one extractor against one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Nothing matched
    Null,
    /// Text of a single node
    Text(String),
    /// Rows of cells
    Table(Vec<Vec<String>>),
    /// Texts of every matching node
    Blocks(Vec<String>),
    /// Texts of matching nodes tagged with their section
    LabeledBlocks(Vec<LabeledBlock>),
}

impl FieldValue {
    /// Emptiness predicate used to decide whether a fallback rule runs.
    ///
    /// `Null`, blank text and zero-length lists are empty. A table with rows
    /// is present even when every cell is blank.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Table(rows) => rows.is_empty(),
            FieldValue::Blocks(blocks) => blocks.is_empty(),
            FieldValue::LabeledBlocks(blocks) => blocks.is_empty(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Borrow the text of a `Text` value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Final record for one extraction call
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    /// The URL that was requested
    pub url: String,
    /// Every field of the rule set, in declaration order
    pub fields: IndexMap<String, FieldValue>,
}

impl ExtractionResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fields: IndexMap::new(),
        }
    }

    /// Look up a field value by name
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Number of fields that resolved to a non-empty value
    pub fn present_count(&self) -> usize {
        self.fields.values().filter(|v| !v.is_empty()).count()
    }
}

/// Serialized as one flat object: `course_url` first, then the fields.
impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(COURSE_URL_KEY, &self.url)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Errors that abort an extraction call
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// No rule set is registered for the URL's source key
    #[error("No selector config for {source_key}")]
    NotConfigured {
        /// Normalized host that was looked up
        source_key: String,
    },

    /// The requested document itself could not be fetched
    #[error("Failed to fetch document: {0}")]
    Fetch(#[from] FetchError),
}
