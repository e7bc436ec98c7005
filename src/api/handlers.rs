// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::http_server::AppState;
use crate::extraction::RuleRegistry;
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub build: String,
    pub sources: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceInfo {
    pub source_key: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesResponse {
    pub sources: Vec<SourceInfo>,
}

impl SourcesResponse {
    /// Sources sorted by key, fields in declaration order
    pub fn from_registry(registry: &RuleRegistry) -> Self {
        let sources = registry
            .source_keys()
            .into_iter()
            .filter_map(|key| {
                registry.get(key).map(|rules| SourceInfo {
                    source_key: key.to_string(),
                    fields: rules.keys().cloned().collect(),
                })
            })
            .collect();
        Self { sources }
    }
}

/// GET /health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: version::VERSION_NUMBER.to_string(),
        build: version::VERSION.to_string(),
        sources: state.service.registry().len(),
    })
}

/// GET /v1/sources
pub async fn sources_handler(State(state): State<Arc<AppState>>) -> Json<SourcesResponse> {
    Json(SourcesResponse::from_registry(state.service.registry()))
}
