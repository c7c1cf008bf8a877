//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (`PORT`, `CONTENT_BUCKET`, ...)
//! 2. TOML config file (if SHOWCASE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};

mod validation;

pub use validation::ConfigError;

/// Content cache TTL used when the configured value is missing or unusable.
pub const DEFAULT_CONTENT_TTL_SECS: u64 = 300;

/// Environment keys read without a prefix.
const ENV_KEYS: &[&str] = &[
    "host",
    "port",
    "content_bucket",
    "content_object",
    "content_cache_ttl_seconds",
    "content_fallback_path",
    "static_dir",
    "storage_endpoint",
    "storage_access_token",
];

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables
/// 2. TOML config file (if SHOWCASE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bind address for the HTTP listener.
    ///
    /// Set via HOST environment variable.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port.
    ///
    /// Set via PORT environment variable.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Storage bucket holding the content object. Empty disables the remote source.
    ///
    /// Set via CONTENT_BUCKET environment variable.
    #[serde(default)]
    pub content_bucket: Option<String>,

    /// Object name inside the bucket.
    ///
    /// Set via CONTENT_OBJECT environment variable.
    #[serde(default = "default_content_object")]
    pub content_object: String,

    /// Freshness window for the content cache, in seconds.
    ///
    /// Set via CONTENT_CACHE_TTL_SECONDS. Anything that is not a positive
    /// integer resolves to the default instead of failing the load.
    #[serde(default = "default_ttl_secs", deserialize_with = "lenient_ttl_secs")]
    pub content_cache_ttl_seconds: u64,

    /// Local file served when the remote source is unavailable.
    ///
    /// Set via CONTENT_FALLBACK_PATH environment variable.
    #[serde(default = "default_fallback_path")]
    pub content_fallback_path: PathBuf,

    /// Directory of static single-page-app assets.
    ///
    /// Set via STATIC_DIR environment variable.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Base URL of the storage JSON API.
    ///
    /// Set via STORAGE_ENDPOINT environment variable.
    #[serde(default = "default_storage_endpoint")]
    pub storage_endpoint: String,

    /// Bearer token for the storage API. When unset, ambient Google
    /// credentials are used instead.
    ///
    /// Set via STORAGE_ACCESS_TOKEN environment variable.
    #[serde(default)]
    pub storage_access_token: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_content_object() -> String {
    "content.json".into()
}

fn default_ttl_secs() -> u64 {
    DEFAULT_CONTENT_TTL_SECS
}

fn default_fallback_path() -> PathBuf {
    PathBuf::from("./dist/content.json")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./dist")
}

fn default_storage_endpoint() -> String {
    "https://storage.googleapis.com".into()
}

/// Unprefixed environment provider for `ENV_KEYS`.
///
/// A variable that is present but empty is skipped, so its default applies.
fn env_provider() -> Env {
    Env::raw().filter(|key| {
        ENV_KEYS.iter().any(|k| key.as_str().eq_ignore_ascii_case(k))
            && std::env::var(key.as_str().to_ascii_uppercase()).is_ok_and(|v| !v.is_empty())
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTtl {
    Seconds(i64),
    Other(IgnoredAny),
}

fn lenient_ttl_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawTtl::deserialize(deserializer)? {
        RawTtl::Seconds(secs) if secs > 0 => secs as u64,
        RawTtl::Seconds(_) | RawTtl::Other(_) => DEFAULT_CONTENT_TTL_SECS,
    })
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            content_bucket: None,
            content_object: default_content_object(),
            content_cache_ttl_seconds: default_ttl_secs(),
            content_fallback_path: default_fallback_path(),
            static_dir: default_static_dir(),
            storage_endpoint: default_storage_endpoint(),
            storage_access_token: None,
        }
    }
}

impl AppConfig {
    /// Content cache TTL as a Duration.
    pub fn content_ttl(&self) -> Duration {
        Duration::from_secs(self.content_cache_ttl_seconds)
    }

    /// The configured bucket, treating an empty value as unset.
    pub fn content_bucket(&self) -> Option<&str> {
        self.content_bucket.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }

    /// `host:port` pair for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables listed in `ENV_KEYS`, unprefixed; set but
    ///    empty variables count as unset
    /// 2. TOML file from `SHOWCASE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SHOWCASE_CONFIG_FILE")
            && !config_path.is_empty()
        {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(env_provider());

        Self::from_figment(&figment)
    }

    /// Extract and validate configuration from an assembled figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailed` when extraction fails and
    /// `ConfigError::Invalid` when validation rejects a value.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
