// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Extract API endpoint handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::request::ExtractApiRequest;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::extraction::ExtractionResult;

/// POST /extract - Extract a course record
///
/// # Request
/// - `course_url`: Course page URL (required)
///
/// # Response
/// Flat JSON object: `course_url` plus every field configured for the URL's
/// source, `null` where nothing was found.
///
/// # Errors
/// - 400 Bad Request: Body is not JSON or `course_url` is missing
/// - 422 Unprocessable Entity: No rules configured for the URL's host
/// - 502 Bad Gateway: The course page could not be fetched
pub async fn extract_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExtractApiRequest>, JsonRejection>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Rejected extract body: {}", rejection);
            ExtractApiRequest::default()
        }
    };

    let url = request.validate().map_err(|e| {
        warn!("Extract validation failed: {}", e);
        ApiError::InvalidRequest(e)
    })?;

    debug!("Extract request: {}", url);

    let result = state.service.extract(url).await.map_err(|e| {
        warn!("Extraction failed for {}: {}", url, e);
        ApiError::from(e)
    })?;

    info!(
        "Extract complete: {} fields ({} present) for {}",
        result.fields.len(),
        result.present_count(),
        url
    );

    Ok(Json(result))
}
