// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Source key normalization tests

use fabstir_course_extractor::source_key;

#[test]
fn test_strips_single_www_prefix() {
    assert_eq!(source_key("https://www.example.ac.uk/courses/physics"), "example.ac.uk");
    assert_eq!(source_key("https://www.www.example.com/"), "www.example.com");
}

#[test]
fn test_host_is_lowercased() {
    assert_eq!(source_key("https://WWW.Example.COM/Course"), "example.com");
}

#[test]
fn test_port_path_and_query_are_ignored() {
    assert_eq!(
        source_key("http://courses.example.com:8080/a/b?year=2025#fees"),
        "courses.example.com"
    );
}

#[test]
fn test_subdomains_are_distinct_keys() {
    assert_ne!(
        source_key("https://study.example.com/"),
        source_key("https://example.com/")
    );
}

#[test]
fn test_unparseable_url_gives_empty_key() {
    assert_eq!(source_key("not a url"), "");
    assert_eq!(source_key(""), "");
    assert_eq!(source_key("/relative/path"), "");
}
