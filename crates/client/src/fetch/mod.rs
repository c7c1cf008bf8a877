//! Outbound page fetching for link previews.
//!
//! ### Request Shape
//! - Absolute http(s) URLs only (see [`url::validate_target`]).
//! - Fixed identifying User-Agent.
//! - Whole-request timeout: 7s.
//!
//! ### Body Bound
//! - At most 2 MiB of body is read. Larger pages are truncated at the cap
//!   rather than rejected, and extraction runs on the prefix.

pub mod url;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::Url;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

pub use self::url::{UrlError, resolve_reference, validate_target};

use showcase_core::Error;

/// User agent sent with every preview fetch.
pub const PREVIEW_USER_AGENT: &str = "Mozilla/5.0 (compatible; LinkPreviewBot/1.0; +https://example.com)";

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string
    pub user_agent: String,

    /// Maximum response body bytes kept (default: 2 MiB)
    pub max_bytes: usize,

    /// Request timeout, including the body read (default: 7s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 10)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: PREVIEW_USER_AGENT.to_string(),
            max_bytes: 2 * 1024 * 1024,
            timeout: Duration::from_secs(7),
            max_redirects: 10,
        }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body, at most `max_bytes` long
    pub bytes: Bytes,
    /// Whether the body was cut at `max_bytes`
    pub truncated: bool,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// Fetches pages for preview extraction.
///
/// The HTTP client implements this; tests substitute counting doubles.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, Error>;
}

/// HTTP fetch client with a bounded body read.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::InvalidInput(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl PageFetcher for FetchClient {
    /// Fetch a page, keeping at most `max_bytes` of its body.
    ///
    /// Statuses outside 200..=399 and transport failures are `HttpError`;
    /// a failure while streaming the body is `BodyRead`.
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, Error> {
        let start = Instant::now();

        let request = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .build()
            .map_err(|e| Error::InvalidInput(e.to_string()))?;

        let mut response = self
            .http
            .execute(request)
            .await
            .map_err(|e| Error::HttpError(format!("network error: {}", e)))?;

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let mut body = BytesMut::new();
        let mut truncated = false;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::BodyRead(format!("failed to read response: {}", e)))?
        {
            let remaining = self.config.max_bytes - body.len();
            if chunk.len() > remaining {
                body.extend_from_slice(&chunk[..remaining]);
                truncated = true;
                break;
            }
            body.extend_from_slice(&chunk);
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            url = %url,
            final_url = %final_url,
            status = status.as_u16(),
            bytes = body.len(),
            truncated,
            fetch_ms,
            "fetched page"
        );

        Ok(FetchResponse {
            url: url.clone(),
            final_url,
            status,
            content_type,
            bytes: body.freeze(),
            truncated,
            fetch_ms,
        })
    }
}
