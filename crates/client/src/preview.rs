//! Link preview service.
//!
//! Couples a [`PageFetcher`] with the per-URL [`PreviewCache`]. Validation
//! happens before the cache is consulted, so malformed targets never reach
//! the map. Failed fetches leave existing entries alone and are not cached;
//! the next request simply tries again.

use bytes::Bytes;
use showcase_core::{Error, PreviewCache};
use std::sync::Arc;

use crate::extract::{LinkPreview, extract_preview};
use crate::fetch::{PageFetcher, validate_target};

pub struct PreviewService {
    fetcher: Arc<dyn PageFetcher>,
    cache: PreviewCache,
}

impl PreviewService {
    pub fn new(fetcher: Arc<dyn PageFetcher>, cache: PreviewCache) -> Self {
        Self { fetcher, cache }
    }

    pub fn cache(&self) -> &PreviewCache {
        &self.cache
    }

    /// Fetch `url` and extract its preview, bypassing the cache.
    pub async fn fetch_preview(&self, url: &str) -> Result<LinkPreview, Error> {
        let target = validate_target(url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let response = self.fetcher.fetch(&target).await?;
        let html = String::from_utf8_lossy(&response.bytes);

        Ok(extract_preview(&html, url))
    }

    /// Serialized preview for `url`, from cache when fresh.
    ///
    /// The cache key is `url` exactly as given.
    pub async fn get_or_fetch(&self, url: &str) -> Result<Bytes, Error> {
        validate_target(url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        if let Some(cached) = self.cache.get_fresh(url) {
            tracing::debug!(url, "preview cache hit");
            return Ok(cached);
        }

        tracing::debug!(url, "preview cache miss");
        let preview = self.fetch_preview(url).await?;
        let serialized = Bytes::from(serde_json::to_vec(&preview).map_err(|e| Error::Encode(e.to_string()))?);
        self.cache.store(url, serialized.clone());

        Ok(serialized)
    }
}
