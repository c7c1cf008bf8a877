//! Content sources behind the content cache.
//!
//! - [`StorageSource`]: the object in a cloud storage bucket (preferred).
//! - [`FileSource`]: a local file, for development and bootstrap.
//! - [`SourceChain`]: tries sources in order until one yields content.

pub mod file;
pub mod storage;

pub use file::FileSource;
pub use storage::StorageSource;

use async_trait::async_trait;
use showcase_core::{ContentSource, Error, SourcePayload};
use std::sync::Arc;

/// Ordered alternatives.
///
/// The first source returning a non-empty payload wins. When every source
/// fails, the first error encountered is returned, so a misconfigured or
/// unreachable primary is what gets reported rather than the fallback's
/// failure.
pub struct SourceChain {
    sources: Vec<Arc<dyn ContentSource>>,
}

impl SourceChain {
    pub fn new(sources: Vec<Arc<dyn ContentSource>>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl ContentSource for SourceChain {
    fn name(&self) -> &str {
        "chain"
    }

    async fn load(&self) -> Result<SourcePayload, Error> {
        let mut first_error = None;

        for source in &self.sources {
            match source.load().await {
                Ok(payload) if !payload.bytes.is_empty() => {
                    tracing::debug!(source = source.name(), bytes = payload.bytes.len(), "content source succeeded");
                    return Ok(payload);
                }
                Ok(_) => {
                    tracing::warn!(source = source.name(), "content source returned no content");
                }
                Err(e @ Error::ConfigurationAbsent(_)) => {
                    tracing::debug!(source = source.name(), error = %e, "content source skipped");
                    first_error.get_or_insert(e);
                }
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "content source failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        Err(first_error.unwrap_or_else(|| Error::SourceRead("no content source yielded content".into())))
    }
}
