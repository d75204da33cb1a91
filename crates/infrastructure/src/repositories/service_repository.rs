use async_trait::async_trait;
use dashlet_application::ports::ServiceRepository;
use dashlet_domain::{DomainError, Service};
use sqlx::SqlitePool;
use tracing::{instrument, warn};

use super::local_state::LocalStateTable;

const SERVICES_KEY: &str = "services";

pub struct SqliteServiceRepository {
    table: LocalStateTable,
}

impl SqliteServiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            table: LocalStateTable::new(pool),
        }
    }
}

#[async_trait]
impl ServiceRepository for SqliteServiceRepository {
    #[instrument(skip(self))]
    async fn load(&self) -> Result<Option<Vec<Service>>, DomainError> {
        let Some(value) = self.table.read(SERVICES_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_value::<Vec<Service>>(value) {
            Ok(services) => Ok(Some(services)),
            Err(e) => {
                warn!(error = %e, "Stored service list is malformed, ignoring it");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, services), fields(count = services.len()))]
    async fn save(&self, services: &[Service]) -> Result<(), DomainError> {
        let value =
            serde_json::to_value(services).map_err(|e| DomainError::DatabaseError(e.to_string()))?;
        self.table.write(SERVICES_KEY, &value).await
    }
}
