// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod extraction;
pub mod version;

// Re-export main types
pub use extraction::{
    load_rule_registry, source_key, DocumentFetcher, ExtractionError, ExtractionResult,
    ExtractionService, ExtractorConfig, FieldValue, HttpFetcher, RuleRegistry,
};
