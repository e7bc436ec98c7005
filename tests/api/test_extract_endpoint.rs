// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! HTTP tests for the extraction API
//!
//! These tests verify that:
//! - POST /extract returns the flat record on success
//! - A missing or malformed body is a 400 and never reaches the fetcher
//! - Unconfigured hosts are a 422 and fetch failures a 502
//! - /health and /v1/sources describe the loaded registry

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use fabstir_course_extractor::{
    api::{create_app, AppState},
    extraction::{ExtractionService, FetchError, RuleRegistry, StaticFetcher},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

const COURSE_URL: &str = "https://www.example.ac.uk/courses/physics";

const RULES: &str = r#"{
    "example.ac.uk": {
        "course_title": {"type": "single", "selector": "h1"},
        "duration": {
            "type": "by_label",
            "container_selector": "div.info",
            "label": "Duration",
            "value_selector": "p"
        },
        "tuition_fee": {
            "primary": {"type": "single", "selector": "span.fee"},
            "fallback": {"type": "single", "selector": "p.fee", "url": "https://www.example.ac.uk/fees"}
        },
        "modules": {"type": "blocks", "selector": "li.module"}
    },
    "other.edu": {
        "course_title": {"type": "single", "selector": "h2"}
    }
}"#;

/// Helper: Router over a static fetcher
fn setup_app(fetcher: &StaticFetcher) -> Router {
    let registry = RuleRegistry::from_json_str(RULES).unwrap();
    let service = ExtractionService::new(Arc::new(registry), Arc::new(fetcher.clone()));
    create_app(Arc::new(AppState::new(service)))
}

fn course_fetcher() -> StaticFetcher {
    StaticFetcher::new()
        .with_page(
            COURSE_URL,
            r#"<h1>BSc Physics</h1><div class="info"><h4>Duration</h4><p>3 years</p></div>"#,
        )
        .with_page("https://www.example.ac.uk/fees", r#"<p class="fee">£9,535</p>"#)
}

fn post_extract(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/extract")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_extract_returns_flat_record() {
    let fetcher = course_fetcher();
    let app = setup_app(&fetcher);

    let body = json!({ "course_url": COURSE_URL }).to_string();
    let response = app.oneshot(post_extract(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(
        json,
        json!({
            "course_url": COURSE_URL,
            "course_title": "BSc Physics",
            "duration": "3 years",
            "tuition_fee": "£9,535",
            "modules": []
        })
    );
}

#[tokio::test]
async fn test_missing_course_url_is_bad_request() {
    let fetcher = course_fetcher();
    let app = setup_app(&fetcher);

    let response = app.oneshot(post_extract("{}")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error"], "course_url missing");
    assert_eq!(json["error_type"], "invalid_request");
    assert!(fetcher.requests().is_empty());
}

#[tokio::test]
async fn test_blank_course_url_is_bad_request() {
    let fetcher = course_fetcher();
    let app = setup_app(&fetcher);

    let response = app
        .oneshot(post_extract(r#"{"course_url": "   "}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(fetcher.requests().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let fetcher = course_fetcher();
    let app = setup_app(&fetcher);

    let response = app.oneshot(post_extract("not json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(fetcher.requests().is_empty());
}

#[tokio::test]
async fn test_unconfigured_host_is_unprocessable() {
    let fetcher = course_fetcher();
    let app = setup_app(&fetcher);

    let body = json!({ "course_url": "https://www.unknown.org/course" }).to_string();
    let response = app.oneshot(post_extract(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = json_body(response).await;
    assert_eq!(json["error"], "No selector config for unknown.org");
    assert_eq!(json["error_type"], "not_configured");
    assert_eq!(json["source_key"], "unknown.org");
}

#[tokio::test]
async fn test_course_page_fetch_failure_is_bad_gateway() {
    let fetcher = StaticFetcher::new()
        .with_error(COURSE_URL, FetchError::Timeout(COURSE_URL.to_string()));
    let app = setup_app(&fetcher);

    let body = json!({ "course_url": COURSE_URL }).to_string();
    let response = app.oneshot(post_extract(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = json_body(response).await;
    assert_eq!(json["error_type"], "fetch_failed");
}

#[tokio::test]
async fn test_extract_rejects_get() {
    let app = setup_app(&course_fetcher());
    let response = app.oneshot(get("/extract")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health() {
    let app = setup_app(&course_fetcher());
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["sources"], 2);
}

#[tokio::test]
async fn test_sources_listing() {
    let app = setup_app(&course_fetcher());
    let response = app.oneshot(get("/v1/sources")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(
        json["sources"],
        json!([
            {
                "source_key": "example.ac.uk",
                "fields": ["course_title", "duration", "tuition_fee", "modules"]
            },
            {
                "source_key": "other.edu",
                "fields": ["course_title"]
            }
        ])
    );
}
