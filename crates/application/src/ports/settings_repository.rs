use async_trait::async_trait;
use dashlet_domain::{DomainError, SettingsMap};
use serde_json::Value;

/// Durable storage for the settings blob.
///
/// `load` returns the raw stored document so the store can purge keys that
/// are no longer recognized. A missing or unreadable blob is `Ok(None)`.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn load(&self) -> Result<Option<Value>, DomainError>;
    async fn save(&self, settings: &SettingsMap) -> Result<(), DomainError>;
}
