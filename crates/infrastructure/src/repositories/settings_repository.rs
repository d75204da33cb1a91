use async_trait::async_trait;
use dashlet_application::ports::SettingsRepository;
use dashlet_domain::{DomainError, SettingsMap};
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::instrument;

use super::local_state::LocalStateTable;

const SETTINGS_KEY: &str = "settings";

pub struct SqliteSettingsRepository {
    table: LocalStateTable,
}

impl SqliteSettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            table: LocalStateTable::new(pool),
        }
    }
}

#[async_trait]
impl SettingsRepository for SqliteSettingsRepository {
    #[instrument(skip(self))]
    async fn load(&self) -> Result<Option<Value>, DomainError> {
        self.table.read(SETTINGS_KEY).await
    }

    #[instrument(skip(self, settings))]
    async fn save(&self, settings: &SettingsMap) -> Result<(), DomainError> {
        self.table.write(SETTINGS_KEY, &settings.to_json()).await
    }
}
