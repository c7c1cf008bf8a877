//! Target URL validation and reference resolution.

/// Error type for preview target validation failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Validate a preview target.
///
/// The input must parse as an absolute URL with scheme `http` or `https`.
/// Unlike a canonicalizer, nothing is defaulted or rewritten: a bare host
/// such as `example.com` is rejected.
pub fn validate_target(input: &str) -> Result<url::Url, UrlError> {
    if input.is_empty() {
        return Err(UrlError::Empty);
    }

    let parsed = url::Url::parse(input).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }
}

/// Resolve `reference` against `base`.
///
/// Relative references become absolute. When either side fails to parse,
/// the raw reference is returned unchanged.
pub fn resolve_reference(base: &str, reference: &str) -> String {
    match url::Url::parse(base).and_then(|b| b.join(reference)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => reference.to_string(),
    }
}
