//! Local file content source.

use async_trait::async_trait;
use showcase_core::{ContentSource, Error, SourcePayload};
use std::path::PathBuf;

/// Reads the content blob from a local path. Files carry no fingerprint.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ContentSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self) -> Result<SourcePayload, Error> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| Error::SourceRead(format!("{}: {}", self.path.display(), e)))?;

        Ok(SourcePayload::new(bytes, String::new()))
    }
}
