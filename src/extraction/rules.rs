// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Declarative field rules
//!
//! A rule file maps each field name to a primary extractor and an optional
//! fallback. Raw configuration entries are checked when they are read, so
//! every [`ExtractorSpec`] in memory carries the parameters its variant needs.

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use super::types::COURSE_URL_KEY;

/// Default label marker inside a `by_label` container
pub const DEFAULT_LABEL_SELECTOR: &str = "h4";
/// Default row selector inside a table
pub const DEFAULT_ROW_SELECTOR: &str = "tr";
/// Default cell selector inside a table row
pub const DEFAULT_CELL_SELECTOR: &str = "td";

/// Errors raised while reading a rule file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read rule file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON rule file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML rule file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Extractor '{kind}' requires '{param}'")]
    MissingParameter { kind: &'static str, param: &'static str },

    #[error("Extractor requires 'type'")]
    MissingType,

    #[error("Field takes either 'primary' or a bare extractor, not both")]
    MixedRuleForms,

    #[error("Field has a 'fallback' but no 'primary'")]
    FallbackWithoutPrimary,

    #[error("Blocks extractor takes either 'selector' or 'sections', not both")]
    AmbiguousBlocks,

    #[error("Extractor with source 'external' requires 'url'")]
    MissingUrl,

    #[error("Extractor with source 'same' cannot name a url ({url})")]
    ConflictingSource { url: String },

    #[error("Fallback for field '{field}' must name an external url")]
    FallbackWithoutUrl { field: String },

    #[error("Field name '{field}' is reserved")]
    ReservedField { field: String },

    #[error("Duplicate rule set for {source_key} after host normalization")]
    DuplicateSource { source_key: String },

    #[error("{source_key}.{field}: {error}")]
    InField {
        source_key: String,
        field: String,
        #[source]
        error: Box<ConfigError>,
    },
}

/// Where the document for an extractor comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// The page that was requested
    Same,
    /// A separately fetched page
    External(String),
}

/// One named section of a filtered blocks extractor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockSection {
    /// Emitted as the `level` of every block collected by this section
    pub level: String,
    pub selector: String,
    /// Substrings that must all appear in a block (case-insensitive)
    #[serde(default)]
    pub contains: Vec<String>,
}

/// Blocks come either as plain texts or as texts tagged by section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlocksSpec {
    Plain { selector: String },
    Filtered { sections: Vec<BlockSection> },
}

/// How a field's value is located in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extractor {
    /// Text of the first node matching `selector`
    Single { selector: String },
    /// Text of the container whose label node reads `label`
    ByLabel {
        container_selector: String,
        label: String,
        label_selector: String,
        value_selector: Option<String>,
    },
    /// Rows of cell texts from the first matching table
    Table {
        selector: String,
        row_selector: String,
        cell_selector: String,
    },
    /// Texts of every matching node
    Blocks(BlocksSpec),
}

impl Extractor {
    /// Config name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Extractor::Single { .. } => "single",
            Extractor::ByLabel { .. } => "by_label",
            Extractor::Table { .. } => "table",
            Extractor::Blocks(_) => "blocks",
        }
    }

    /// Every selector string this extractor evaluates
    pub fn selectors(&self) -> Vec<&str> {
        match self {
            Extractor::Single { selector } => vec![selector.as_str()],
            Extractor::ByLabel {
                container_selector,
                label_selector,
                value_selector,
                ..
            } => {
                let mut out = vec![container_selector.as_str(), label_selector.as_str()];
                out.extend(value_selector.as_deref());
                out
            }
            Extractor::Table {
                selector,
                row_selector,
                cell_selector,
            } => vec![
                selector.as_str(),
                row_selector.as_str(),
                cell_selector.as_str(),
            ],
            Extractor::Blocks(BlocksSpec::Plain { selector }) => vec![selector.as_str()],
            Extractor::Blocks(BlocksSpec::Filtered { sections }) => {
                sections.iter().map(|s| s.selector.as_str()).collect()
            }
        }
    }
}

/// An extractor plus the document it runs against
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawExtractorSpec")]
pub struct ExtractorSpec {
    pub extractor: Extractor,
    pub source: DocumentSource,
}

impl ExtractorSpec {
    /// Extractor over the requested page
    pub fn same(extractor: Extractor) -> Self {
        Self {
            extractor,
            source: DocumentSource::Same,
        }
    }

    /// Extractor over a separately fetched page
    pub fn external(extractor: Extractor, url: impl Into<String>) -> Self {
        Self {
            extractor,
            source: DocumentSource::External(url.into()),
        }
    }

    pub fn external_url(&self) -> Option<&str> {
        match &self.source {
            DocumentSource::Same => None,
            DocumentSource::External(url) => Some(url),
        }
    }
}

/// Primary extractor with an optional fallback
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawFieldRule")]
pub struct FieldRule {
    pub primary: ExtractorSpec,
    pub fallback: Option<ExtractorSpec>,
}

impl FieldRule {
    pub fn new(primary: ExtractorSpec) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: ExtractorSpec) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Check the invariants that serde cannot express on its own
    pub fn validate(&self, field: &str) -> Result<(), ConfigError> {
        if field == COURSE_URL_KEY {
            return Err(ConfigError::ReservedField {
                field: field.to_string(),
            });
        }
        if let Some(fallback) = &self.fallback {
            if fallback.source == DocumentSource::Same {
                return Err(ConfigError::FallbackWithoutUrl {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Field rules for one source, in declaration order
pub type RuleSet = IndexMap<String, FieldRule>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ExtractorKind {
    Single,
    ByLabel,
    Table,
    Blocks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SourceKind {
    Same,
    External,
}

#[derive(Debug, Deserialize)]
struct RawExtractorSpec {
    #[serde(rename = "type")]
    kind: Option<ExtractorKind>,
    selector: Option<String>,
    container_selector: Option<String>,
    label: Option<String>,
    label_selector: Option<String>,
    value_selector: Option<String>,
    row_selector: Option<String>,
    cell_selector: Option<String>,
    #[serde(default)]
    sections: Vec<BlockSection>,
    source: Option<SourceKind>,
    url: Option<String>,
}

fn required(
    value: Option<String>,
    kind: &'static str,
    param: &'static str,
) -> Result<String, ConfigError> {
    value.ok_or(ConfigError::MissingParameter { kind, param })
}

impl TryFrom<RawExtractorSpec> for ExtractorSpec {
    type Error = ConfigError;

    fn try_from(raw: RawExtractorSpec) -> Result<Self, Self::Error> {
        let kind = raw.kind.ok_or(ConfigError::MissingType)?;
        let extractor = match kind {
            ExtractorKind::Single => Extractor::Single {
                selector: required(raw.selector, "single", "selector")?,
            },
            ExtractorKind::ByLabel => Extractor::ByLabel {
                container_selector: required(
                    raw.container_selector,
                    "by_label",
                    "container_selector",
                )?,
                label: required(raw.label, "by_label", "label")?,
                label_selector: raw
                    .label_selector
                    .unwrap_or_else(|| DEFAULT_LABEL_SELECTOR.to_string()),
                value_selector: raw.value_selector,
            },
            ExtractorKind::Table => Extractor::Table {
                selector: required(raw.selector, "table", "selector")?,
                row_selector: raw
                    .row_selector
                    .unwrap_or_else(|| DEFAULT_ROW_SELECTOR.to_string()),
                cell_selector: raw
                    .cell_selector
                    .unwrap_or_else(|| DEFAULT_CELL_SELECTOR.to_string()),
            },
            ExtractorKind::Blocks => match (raw.selector, raw.sections.is_empty()) {
                (Some(_), false) => return Err(ConfigError::AmbiguousBlocks),
                (Some(selector), true) => Extractor::Blocks(BlocksSpec::Plain { selector }),
                (None, false) => Extractor::Blocks(BlocksSpec::Filtered {
                    sections: raw.sections,
                }),
                (None, true) => {
                    return Err(ConfigError::MissingParameter {
                        kind: "blocks",
                        param: "selector",
                    })
                }
            },
        };

        let source = match (raw.source, raw.url) {
            (Some(SourceKind::Same), Some(url)) => {
                return Err(ConfigError::ConflictingSource { url })
            }
            (Some(SourceKind::Same), None) | (None, None) => DocumentSource::Same,
            (Some(SourceKind::External), None) => return Err(ConfigError::MissingUrl),
            (_, Some(url)) => DocumentSource::External(url),
        };

        Ok(Self { extractor, source })
    }
}

/// A field entry is either `{primary, fallback}` or a bare extractor.
/// The bare form is flattened in so its errors keep their own message.
#[derive(Debug, Deserialize)]
struct RawFieldRule {
    primary: Option<ExtractorSpec>,
    fallback: Option<ExtractorSpec>,
    #[serde(flatten)]
    bare: RawExtractorSpec,
}

impl TryFrom<RawFieldRule> for FieldRule {
    type Error = ConfigError;

    fn try_from(raw: RawFieldRule) -> Result<Self, Self::Error> {
        match raw.primary {
            Some(primary) => {
                if raw.bare.kind.is_some() {
                    return Err(ConfigError::MixedRuleForms);
                }
                Ok(Self {
                    primary,
                    fallback: raw.fallback,
                })
            }
            None if raw.fallback.is_some() => Err(ConfigError::FallbackWithoutPrimary),
            None => ExtractorSpec::try_from(raw.bare).map(Self::new),
        }
    }
}
