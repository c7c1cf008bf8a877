//! Per-URL link preview cache.
//!
//! Keys are the exact URL strings callers ask for, with no canonicalization.
//! Entries are built fully before insertion and replaced whole. Stale entries
//! stay in the map until a refetch succeeds, and failures are never cached.

use std::time::Duration;

use bytes::Bytes;
use dashmap::DashMap;
use tokio::time::Instant;

/// Fixed freshness window for link previews.
pub const PREVIEW_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug)]
struct PreviewEntry {
    serialized: Bytes,
    fetched_at: Instant,
}

impl PreviewEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() >= ttl
    }
}

/// Concurrent per-URL cache of serialized previews.
#[derive(Debug)]
pub struct PreviewCache {
    entries: DashMap<String, PreviewEntry>,
    ttl: Duration,
}

impl Default for PreviewCache {
    fn default() -> Self {
        Self::new(PREVIEW_TTL)
    }
}

impl PreviewCache {
    pub fn new(ttl: Duration) -> Self {
        Self { entries: DashMap::new(), ttl }
    }

    /// Stored bytes for `url` if the entry exists and has not expired.
    pub fn get_fresh(&self, url: &str) -> Option<Bytes> {
        let entry = self.entries.get(url)?;
        if entry.is_expired(self.ttl) {
            return None;
        }
        Some(entry.serialized.clone())
    }

    /// Insert or replace the entry for `url`.
    pub fn store(&self, url: &str, serialized: Bytes) {
        self.entries
            .insert(url.to_string(), PreviewEntry { serialized, fetched_at: Instant::now() });
    }

    /// Number of entries, including expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
