// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Rule-driven course extraction
//!
//! Turns a course page URL into a flat record using per-source declarative
//! rules instead of one scraper per site.
//!
//! ## Architecture
//!
//! ```text
//! URL → source key → RuleRegistry → RuleSet
//!                                     ↓ (per field, declaration order)
//!        DocumentFetcher → PageCache → Document → resolve(primary)
//!                                                 ↓ empty?
//!                                               resolve(fallback)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let config = ExtractorConfig::from_env();
//! let registry = Arc::new(load_rule_registry(&config.rules_path)?);
//! let fetcher = Arc::new(HttpFetcher::new(&config)?);
//! let service = ExtractionService::new(registry, fetcher);
//!
//! let record = service.extract("https://www.example.ac.uk/courses/physics").await?;
//! ```

pub mod cache;
pub mod config;
pub mod document;
pub mod fetcher;
pub mod registry;
pub mod resolver;
pub mod rules;
pub mod service;
pub mod testing;
pub mod types;

pub use cache::{PageCache, PageCacheStats};
pub use config::ExtractorConfig;
pub use document::{Document, SelectorError};
pub use fetcher::{DocumentFetcher, FetchError, FetchedPage, HttpFetcher};
pub use registry::{load_rule_registry, source_key, RuleRegistry, SelectorWarning};
pub use resolver::resolve;
pub use rules::{
    BlockSection, BlocksSpec, ConfigError, DocumentSource, Extractor, ExtractorSpec, FieldRule,
    RuleSet,
};
pub use service::ExtractionService;
pub use testing::StaticFetcher;
pub use types::{ExtractionError, ExtractionResult, FieldValue, LabeledBlock, COURSE_URL_KEY};
