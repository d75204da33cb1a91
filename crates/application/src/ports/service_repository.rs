use async_trait::async_trait;
use dashlet_domain::{DomainError, Service};

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// `Ok(None)` when no list has ever been saved.
    async fn load(&self) -> Result<Option<Vec<Service>>, DomainError>;
    async fn save(&self, services: &[Service]) -> Result<(), DomainError>;
}
