//! HTTP-facing errors for the showcase server.
//!
//! Reasons are terse and never carry internal detail; the detail is logged
//! where the error is produced.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use showcase_core::Error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing url")]
    MissingUrl,

    #[error("invalid url")]
    InvalidUrl,

    #[error("bad request")]
    BadRequest,

    #[error("failed to fetch")]
    FetchFailed,

    #[error("failed to read")]
    ReadFailed,

    #[error("failed to load content")]
    ContentUnavailable,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingUrl | ApiError::InvalidUrl | ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::FetchFailed | ApiError::ReadFailed => StatusCode::BAD_GATEWAY,
            ApiError::ContentUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidUrl(_) => ApiError::InvalidUrl,
            Error::InvalidInput(_) => ApiError::BadRequest,
            Error::HttpError(_) => ApiError::FetchFailed,
            Error::BodyRead(_) | Error::Encode(_) => ApiError::ReadFailed,
            Error::ConfigurationAbsent(_) | Error::SourceRead(_) => ApiError::ContentUnavailable,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8"), (header::X_CONTENT_TYPE_OPTIONS, "nosniff")],
            format!("{self}\n"),
        )
            .into_response()
    }
}
