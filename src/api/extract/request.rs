// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Extract API request types

use serde::{Deserialize, Serialize};

/// Request body for POST /extract
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractApiRequest {
    /// Course page to extract (required)
    #[serde(default)]
    pub course_url: Option<String>,
}

impl ExtractApiRequest {
    pub fn new(course_url: impl Into<String>) -> Self {
        Self {
            course_url: Some(course_url.into()),
        }
    }

    /// Validate the request, returning the trimmed URL
    pub fn validate(&self) -> Result<&str, String> {
        match self.course_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err("course_url missing".to_string()),
        }
    }
}
