mod file_source;
mod http_source;

pub use file_source::FileConfigSource;
pub use http_source::HttpConfigSource;

use dashlet_application::ports::ExternalConfigSource;
use dashlet_domain::DomainError;
use std::sync::Arc;

/// Picks the source implementation for a configured location: `http://` and
/// `https://` URLs are fetched remotely, anything else (optionally prefixed
/// with `file://`) is a local path.
pub fn build_config_source(location: &str) -> Result<Arc<dyn ExternalConfigSource>, DomainError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(DomainError::ConfigError(
            "external config location is empty".to_string(),
        ));
    }

    let lower = location.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Ok(Arc::new(HttpConfigSource::new(location)?));
    }

    let path = location.strip_prefix("file://").unwrap_or(location);
    Ok(Arc::new(FileConfigSource::new(path)))
}
