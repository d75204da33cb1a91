use async_trait::async_trait;
use dashlet_domain::DomainError;
use serde_json::Value;

/// Where the external `{settings, services}` document comes from.
///
/// Implementations bypass any caching and return the parsed document.
/// Transport failures are `DomainError::Fetch`, unparseable bodies
/// `DomainError::Parse`.
#[async_trait]
pub trait ExternalConfigSource: Send + Sync {
    async fn fetch(&self) -> Result<Value, DomainError>;

    fn describe(&self) -> String;
}
