//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// The content TTL is never rejected here; unusable values were already
    /// replaced by the default during deserialization.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `host` is empty
    /// - `content_object` is empty
    /// - `storage_endpoint` is not an http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "host".into(), reason: "must not be empty".into() });
        }

        if self.content_object.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "content_object".into(), reason: "must not be empty".into() });
        }

        if !(self.storage_endpoint.starts_with("http://") || self.storage_endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "storage_endpoint".into(),
                reason: "must be an http(s) URL".into(),
            });
        }

        if self.content_bucket().is_none() {
            tracing::info!(
                fallback = %self.content_fallback_path.display(),
                "content_bucket is not set; content is served from the fallback file only"
            );
        }

        Ok(())
    }
}
