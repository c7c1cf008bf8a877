//! Cloud storage content source.
//!
//! Talks to the Google Cloud Storage JSON API:
//! - object bytes: `GET {endpoint}/storage/v1/b/{bucket}/o/{object}?alt=media`
//! - object metadata: `GET {endpoint}/storage/v1/b/{bucket}/o/{object}`
//!
//! The metadata `etag` becomes the content fingerprint. A failed metadata
//! lookup does not fail the load; the bytes are returned without one.
//!
//! Requests carry a bearer token. A configured static token is used as is;
//! otherwise one is obtained from the ambient Google credentials (service
//! account file, gcloud user credentials, or the metadata server).

use async_trait::async_trait;
use gcp_auth::TokenProvider;
use reqwest::{Client, Url};
use serde::Deserialize;
use showcase_core::{AppConfig, ContentSource, Error, SourcePayload};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// OAuth scope for reading objects.
const READ_ONLY_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_only";

/// Object metadata fields we read.
#[derive(Debug, Deserialize)]
struct ObjectMetadata {
    #[serde(default)]
    etag: Option<String>,
}

/// Where the bearer token comes from.
enum Credentials {
    /// `STORAGE_ACCESS_TOKEN` override.
    Static(String),
    /// Ambient credentials, discovered on first use and kept afterwards.
    Ambient(OnceCell<Arc<dyn TokenProvider>>),
}

impl Credentials {
    async fn bearer(&self) -> Result<String, Error> {
        match self {
            Credentials::Static(token) => Ok(token.clone()),
            Credentials::Ambient(provider) => {
                let provider = provider
                    .get_or_try_init(gcp_auth::provider)
                    .await
                    .map_err(|e| Error::SourceRead(format!("storage credentials unavailable: {e}")))?;
                let token = provider
                    .token(&[READ_ONLY_SCOPE])
                    .await
                    .map_err(|e| Error::SourceRead(format!("storage token request failed: {e}")))?;
                Ok(token.as_str().to_string())
            }
        }
    }
}

/// Reads the content object from a storage bucket.
///
/// Built once at startup and shared; the underlying HTTP client pools
/// connections across requests and the credential provider is reused.
pub struct StorageSource {
    http: Client,
    endpoint: Url,
    bucket: Option<String>,
    object: String,
    credentials: Credentials,
}

impl StorageSource {
    /// Create a storage source.
    ///
    /// A `None` bucket yields a source whose every load reports
    /// `ConfigurationAbsent`. A `None` (or empty) access token selects the
    /// ambient Google credentials.
    pub fn new(
        endpoint: &str, bucket: Option<String>, object: String, access_token: Option<String>,
    ) -> Result<Self, Error> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| Error::InvalidInput(format!("storage endpoint {endpoint}: {e}")))?;

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::InvalidInput(format!("failed to build storage client: {}", e)))?;

        let credentials = match access_token.filter(|t| !t.is_empty()) {
            Some(token) => Credentials::Static(token),
            None => Credentials::Ambient(OnceCell::new()),
        };

        Ok(Self { http, endpoint, bucket, object, credentials })
    }

    /// Create a storage source from application configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Self::new(
            &config.storage_endpoint,
            config.content_bucket().map(str::to_string),
            config.content_object.clone(),
            config.storage_access_token.clone(),
        )
    }

    /// Metadata URL for the object; the media URL adds `alt=media`.
    fn object_url(&self, bucket: &str) -> Result<Url, Error> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| Error::SourceRead(format!("storage endpoint {} cannot be a base", self.endpoint)))?
            .pop_if_empty()
            .extend(["storage", "v1", "b", bucket, "o", self.object.as_str()]);
        Ok(url)
    }

    async fn read_object(&self, bucket: &str, token: &str) -> Result<bytes::Bytes, Error> {
        let mut url = self.object_url(bucket)?;
        url.query_pairs_mut().append_pair("alt", "media");

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| Error::SourceRead(format!("{bucket}/{}: {e}", self.object)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::SourceRead(format!("{bucket}/{}: status {}", self.object, status.as_u16())));
        }

        response
            .bytes()
            .await
            .map_err(|e| Error::SourceRead(format!("{bucket}/{}: {e}", self.object)))
    }

    async fn read_etag(&self, bucket: &str, token: &str) -> Result<String, Error> {
        let response = self
            .http
            .get(self.object_url(bucket)?)
            .bearer_auth(token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::SourceRead(e.to_string()))?;

        let metadata: ObjectMetadata = response.json().await.map_err(|e| Error::SourceRead(e.to_string()))?;
        Ok(metadata.etag.unwrap_or_default())
    }
}

#[async_trait]
impl ContentSource for StorageSource {
    fn name(&self) -> &str {
        "storage"
    }

    async fn load(&self) -> Result<SourcePayload, Error> {
        let Some(bucket) = self.bucket.as_deref() else {
            return Err(Error::ConfigurationAbsent("CONTENT_BUCKET is not set".into()));
        };

        let token = self.credentials.bearer().await?;
        let bytes = self.read_object(bucket, &token).await?;

        let fingerprint = match self.read_etag(bucket, &token).await {
            Ok(etag) => etag,
            Err(e) => {
                tracing::warn!(
                    bucket,
                    object = %self.object,
                    error = %e,
                    "object metadata unavailable; serving without fingerprint"
                );
                String::new()
            }
        };

        Ok(SourcePayload::new(bytes, fingerprint))
    }
}
