//! `GET /api/link-preview?url=<target>`.

use axum::extract::{Query, State, rejection::QueryRejection};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use crate::error::ApiError;
use crate::handler::AppState;

/// Browser cache lifetime for previews, matching the server-side TTL.
const PREVIEW_CACHE_CONTROL: &str = "public, max-age=3600";

/// First `url` value in the query. Later duplicates are ignored.
fn target_url(pairs: Vec<(String, String)>) -> Option<String> {
    pairs.into_iter().find(|(key, _)| key == "url").map(|(_, value)| value)
}

pub async fn get_link_preview(
    State(state): State<AppState>, query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(pairs) = query.map_err(|e| {
        tracing::debug!(error = %e, "unparseable preview query");
        ApiError::BadRequest
    })?;

    let url = target_url(pairs).filter(|u| !u.is_empty()).ok_or(ApiError::MissingUrl)?;

    let body = state.previews.get_or_fetch(&url).await.map_err(|e| {
        if e.is_client_error() {
            tracing::debug!(url = %url, error = %e, "preview request rejected");
        } else {
            tracing::warn!(url = %url, error = %e, "preview fetch failed");
        }
        ApiError::from(e)
    })?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8")),
            (header::CACHE_CONTROL, HeaderValue::from_static(PREVIEW_CACHE_CONTROL)),
        ],
        body,
    )
        .into_response())
}
