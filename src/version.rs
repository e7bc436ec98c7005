// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Fabstir Course Extractor

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-declarative-rules-2025-11-03";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Major version number
pub const VERSION_MAJOR: u32 = 0;

/// Minor version number
pub const VERSION_MINOR: u32 = 1;

/// Patch version number
pub const VERSION_PATCH: u32 = 0;

/// Build date
pub const BUILD_DATE: &str = "2025-11-03";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "declarative-rules",
    "json-rules",
    "toml-rules",
    "single-extractor",
    "by-label-extractor",
    "table-extractor",
    "blocks-extractor",
    "filtered-blocks",
    "external-sources",
    "fallback-rules",
    "per-call-page-cache",
    "private-host-blocking",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Fabstir Course Extractor {} ({})", VERSION_NUMBER, BUILD_DATE)
}
