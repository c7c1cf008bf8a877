//! `GET /api/content`.
//!
//! Serves the cached content blob. A fresh entry is served directly; a stale
//! or empty one is refreshed first. The `If-None-Match` comparison always
//! runs against whichever entry ends up being served.

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::handler::AppState;

pub async fn get_content(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    let if_none_match = headers.get(header::IF_NONE_MATCH).and_then(|v| v.to_str().ok());

    let entry = state
        .content
        .get_or_refresh(state.sources.as_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "content fetch error");
            ApiError::ContentUnavailable
        })?;

    if entry.matches(if_none_match) {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let mut response = (StatusCode::OK, entry.payload().clone()).into_response();
    let response_headers = response.headers_mut();
    response_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
    let max_age = format!("public, max-age={}", state.content.ttl().as_secs());
    if let Ok(value) = HeaderValue::from_str(&max_age) {
        response_headers.insert(header::CACHE_CONTROL, value);
    }
    if !entry.fingerprint().is_empty() {
        match HeaderValue::from_str(entry.fingerprint()) {
            Ok(value) => {
                response_headers.insert(header::ETAG, value);
            }
            Err(_) => tracing::warn!(fingerprint = entry.fingerprint(), "fingerprint is not a valid header value"),
        }
    }

    Ok(response)
}
