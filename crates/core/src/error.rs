//! Unified error types for showcase.
//!
//! Variants fall into two families: content source failures, which the
//! refresh protocol turns into fallback attempts, and preview fetch failures,
//! which surface as a single upstream error for the request.

/// Unified error types for the showcase server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No remote source is configured. Not fatal on its own, it triggers fallback.
    #[error("CONFIGURATION_ABSENT: {0}")]
    ConfigurationAbsent(String),

    /// Remote object or local file could not be read.
    #[error("SOURCE_READ: {0}")]
    SourceRead(String),

    /// Target URL is not an absolute http(s) URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Outbound request could not be built from otherwise valid input.
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Network failure or non-success status from the target.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Response body failed mid-read.
    #[error("BODY_READ: {0}")]
    BodyRead(String),

    /// Preview could not be serialized.
    #[error("ENCODE_FAILED: {0}")]
    Encode(String),
}

impl Error {
    /// Whether the caller supplied bad input, as opposed to an upstream failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidUrl(_) | Error::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::SourceRead("bucket/content.json: 404".to_string());
        assert!(err.to_string().contains("SOURCE_READ"));
        assert!(err.to_string().contains("content.json"));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(Error::InvalidUrl("ftp://example.com".into()).is_client_error());
        assert!(Error::InvalidInput("bad".into()).is_client_error());
        assert!(!Error::HttpError("status 500".into()).is_client_error());
        assert!(!Error::BodyRead("reset".into()).is_client_error());
        assert!(!Error::ConfigurationAbsent("CONTENT_BUCKET".into()).is_client_error());
    }
}
