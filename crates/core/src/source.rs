//! Content source seam.
//!
//! A content source yields the raw JSON blob served by the content endpoint,
//! together with an optional fingerprint. Sources are tried in order by the
//! refresh protocol; implementations live in the client crate.

use async_trait::async_trait;
use bytes::Bytes;

use crate::Error;

/// Bytes read from a content source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcePayload {
    /// The complete content blob.
    pub bytes: Bytes,
    /// Opaque content identifier, empty when the source has none.
    pub fingerprint: String,
}

impl SourcePayload {
    pub fn new(bytes: impl Into<Bytes>, fingerprint: impl Into<String>) -> Self {
        Self { bytes: bytes.into(), fingerprint: fingerprint.into() }
    }
}

/// A provider of primary content.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Read the full content blob.
    ///
    /// An empty payload is a valid return value here; callers decide whether
    /// emptiness counts as a failure.
    async fn load(&self) -> Result<SourcePayload, Error>;
}
