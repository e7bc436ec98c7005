// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Rule file loading tests
//!
//! Covers JSON and TOML rule files, the legacy bare-extractor form,
//! host normalization of keys and rejection of malformed rules.

use fabstir_course_extractor::extraction::{
    load_rule_registry, ConfigError, DocumentSource, Extractor, RuleRegistry,
};
use std::io::Write;
use tempfile::NamedTempFile;

const RULES_JSON: &str = r#"{
    "WWW.Example.ac.uk": {
        "course_title": {"type": "single", "selector": "h1.course-title"},
        "duration": {
            "type": "by_label",
            "container_selector": "div.key-info",
            "label": "Duration",
            "value_selector": "p"
        },
        "tuition_fee": {
            "primary": {"type": "table", "selector": "table.fees"},
            "fallback": {
                "type": "single",
                "selector": "p.fee",
                "source": "external",
                "url": "https://www.example.ac.uk/fees"
            }
        }
    }
}"#;

fn write_rules(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp rule file");
    file.write_all(content.as_bytes()).expect("write rules");
    file
}

#[test]
fn test_load_json_rules() {
    let file = write_rules(".json", RULES_JSON);
    let registry = load_rule_registry(file.path()).unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.source_keys(), vec!["example.ac.uk"]);

    let rules = registry.lookup("example.ac.uk").unwrap();
    let fields: Vec<&str> = rules.keys().map(String::as_str).collect();
    assert_eq!(fields, vec!["course_title", "duration", "tuition_fee"]);

    assert!(rules["course_title"].fallback.is_none());
    assert_eq!(rules["course_title"].primary.source, DocumentSource::Same);

    let fee = &rules["tuition_fee"];
    assert!(matches!(fee.primary.extractor, Extractor::Table { .. }));
    let fallback = fee.fallback.as_ref().unwrap();
    assert_eq!(
        fallback.source,
        DocumentSource::External("https://www.example.ac.uk/fees".to_string())
    );
}

#[test]
fn test_load_toml_rules() {
    let toml = r#"
["example.com".course_title]
type = "single"
selector = "h1"

["example.com".modules]
type = "blocks"

[["example.com".modules.sections]]
level = "Year 1"
selector = "li.module"
contains = ["year 1"]

[["example.com".modules.sections]]
level = "Year 2"
selector = "li.module"
contains = ["year 2"]

["example.com".entry.primary]
type = "single"
selector = "div.entry"

["example.com".entry.fallback]
type = "blocks"
selector = "p"
url = "https://example.com/entry-requirements"
"#;
    let file = write_rules(".toml", toml);
    let registry = load_rule_registry(file.path()).unwrap();

    let rules = registry.lookup("example.com").unwrap();
    assert_eq!(rules.len(), 3);
    assert!(rules.contains_key("course_title"));
    assert!(rules["entry"].fallback.is_some());
    assert!(rules["modules"].fallback.is_none());
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_rule_registry("/nonexistent/selectors.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/selectors.json"));
}

#[test]
fn test_malformed_json_is_rejected() {
    let file = write_rules(".json", "{ not json");
    let err = load_rule_registry(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn test_unknown_extractor_type_is_rejected() {
    let result = RuleRegistry::from_json_str(
        r#"{"example.com": {"title": {"type": "regex", "selector": "h1"}}}"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_missing_parameter_is_rejected() {
    let err = RuleRegistry::from_json_str(
        r#"{"example.com": {"duration": {"type": "by_label", "container_selector": "div"}}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
    assert!(err.to_string().contains("Extractor 'by_label' requires 'label'"), "{err}");
}

#[test]
fn test_external_primary_without_url_is_rejected() {
    let err = RuleRegistry::from_json_str(
        r#"{"example.com": {"fee": {"primary": {"type": "single", "selector": "h1", "source": "external"}}}}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("requires 'url'"), "{err}");
}

#[test]
fn test_toml_errors_keep_their_message() {
    let file = write_rules(
        ".toml",
        r#"
["example.com".modules]
type = "blocks"
"#,
    );
    let err = load_rule_registry(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
    assert!(err.to_string().contains("Extractor 'blocks' requires 'selector'"), "{err}");
}

#[test]
fn test_duplicate_source_after_normalization_is_rejected() {
    let err = RuleRegistry::from_json_str(
        r#"{
            "www.example.com": {"title": {"type": "single", "selector": "h1"}},
            "EXAMPLE.com": {"title": {"type": "single", "selector": "h2"}}
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateSource { .. }));
    assert!(err.to_string().contains("example.com"));
}

#[test]
fn test_fallback_must_be_external() {
    let err = RuleRegistry::from_json_str(
        r#"{"example.com": {"fee": {
            "primary": {"type": "single", "selector": "p.fee"},
            "fallback": {"type": "single", "selector": "span.fee"}
        }}}"#,
    )
    .unwrap_err();

    match err {
        ConfigError::InField {
            source_key,
            field,
            error,
        } => {
            assert_eq!(source_key, "example.com");
            assert_eq!(field, "fee");
            assert!(matches!(*error, ConfigError::FallbackWithoutUrl { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_course_url_field_is_reserved() {
    let err = RuleRegistry::from_json_str(
        r#"{"example.com": {"course_url": {"type": "single", "selector": "a"}}}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("reserved"));
}

#[test]
fn test_invalid_selector_loads_with_warning() {
    let registry = RuleRegistry::from_json_str(
        r#"{"example.com": {"title": {"type": "single", "selector": "h1[["}}}"#,
    )
    .unwrap();

    let warnings = registry.selector_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].source_key, "example.com");
    assert_eq!(warnings[0].field, "title");
    assert_eq!(warnings[0].selector, "h1[[");
}
