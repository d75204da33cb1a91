use async_trait::async_trait;
use dashlet_application::ports::ExternalConfigSource;
use dashlet_domain::{DocumentFormat, DomainError};
use serde_json::Value;
use std::path::PathBuf;
use tracing::instrument;

/// Reads the external document from the local filesystem on every fetch.
pub struct FileConfigSource {
    path: PathBuf,
    format: DocumentFormat,
}

impl FileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = DocumentFormat::from_path(&path.to_string_lossy());
        Self { path, format }
    }
}

#[async_trait]
impl ExternalConfigSource for FileConfigSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> Result<Value, DomainError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| DomainError::Fetch(format!("{}: {}", self.path.display(), e)))?;

        self.format.parse(&text)
    }

    fn describe(&self) -> String {
        format!("file://{}", self.path.display())
    }
}
