//! Single-slot content cache with conditional-request support.
//!
//! Readers take the shared lock only long enough to clone an `Arc` to the
//! current entry. Refresh performs source I/O without holding any lock and
//! then swaps the new entry in under the exclusive lock. Overlapping
//! refreshes are not deduplicated; the last one to install wins.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::{ContentSource, Error};

/// One immutable generation of cached content.
#[derive(Debug, Clone)]
pub struct ContentEntry {
    payload: Bytes,
    fingerprint: String,
    fetched_at: Instant,
}

impl ContentEntry {
    /// The never-fetched entry installed at startup.
    pub fn empty() -> Self {
        Self { payload: Bytes::new(), fingerprint: String::new(), fetched_at: Instant::now() }
    }

    pub fn new(payload: Bytes, fingerprint: String) -> Self {
        Self { payload, fingerprint, fetched_at: Instant::now() }
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    /// True until the first successful refresh.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        !self.is_empty() && self.age() < ttl
    }

    /// Whether an `If-None-Match` token names this entry.
    ///
    /// An empty fingerprint never matches, so content without a fingerprint
    /// is always sent in full.
    pub fn matches(&self, if_none_match: Option<&str>) -> bool {
        match if_none_match {
            Some(token) => !self.fingerprint.is_empty() && !token.is_empty() && token == self.fingerprint,
            None => false,
        }
    }
}

/// Process-wide content cache.
#[derive(Debug)]
pub struct ContentCache {
    entry: RwLock<Arc<ContentEntry>>,
    ttl: Duration,
}

impl ContentCache {
    pub fn new(ttl: Duration) -> Self {
        Self { entry: RwLock::new(Arc::new(ContentEntry::empty())), ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Snapshot of the current entry.
    pub async fn get(&self) -> Arc<ContentEntry> {
        Arc::clone(&*self.entry.read().await)
    }

    /// Load from `source` and install the result as the new entry.
    ///
    /// On failure the current entry is left untouched.
    pub async fn refresh(&self, source: &dyn ContentSource) -> Result<Arc<ContentEntry>, Error> {
        let loaded = source.load().await?;
        if loaded.bytes.is_empty() {
            return Err(Error::SourceRead(format!("{} returned no content", source.name())));
        }

        let entry = Arc::new(ContentEntry::new(loaded.bytes, loaded.fingerprint));
        *self.entry.write().await = Arc::clone(&entry);

        tracing::debug!(
            source = source.name(),
            bytes = entry.payload.len(),
            fingerprint = %entry.fingerprint,
            "content cache refreshed"
        );

        Ok(entry)
    }

    /// Return the cached entry when fresh, refreshing from `source` otherwise.
    pub async fn get_or_refresh(&self, source: &dyn ContentSource) -> Result<Arc<ContentEntry>, Error> {
        let current = self.get().await;
        if current.is_fresh(self.ttl) {
            tracing::debug!(age_ms = current.age().as_millis() as u64, "content cache hit");
            return Ok(current);
        }

        tracing::debug!(empty = current.is_empty(), "content cache miss");
        self.refresh(source).await
    }
}
