use dashlet_application::services::{ServiceStore, SettingsStore};
use dashlet_domain::DomainError;
use dashlet_infrastructure::repositories::{SqliteServiceRepository, SqliteSettingsRepository};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

pub struct Stores {
    pub settings: Arc<SettingsStore>,
    pub services: Arc<ServiceStore>,
}

impl Stores {
    /// Builds both stores and loads their persisted state.
    pub async fn new(pool: SqlitePool) -> Result<Self, DomainError> {
        let settings = Arc::new(SettingsStore::new(Arc::new(SqliteSettingsRepository::new(
            pool.clone(),
        ))));
        let services = Arc::new(ServiceStore::new(Arc::new(SqliteServiceRepository::new(
            pool,
        ))));

        settings.load().await?;
        let loaded = services.load().await?;
        info!(services = loaded.len(), "Local state loaded");

        Ok(Self { settings, services })
    }
}
