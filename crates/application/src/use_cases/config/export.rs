use dashlet_domain::{ConfigDocument, DocumentFormat, DomainError};
use std::sync::Arc;
use tracing::instrument;

use crate::services::{ServiceStore, SettingsStore};

pub struct ExportConfigUseCase {
    settings: Arc<SettingsStore>,
    services: Arc<ServiceStore>,
}

impl ExportConfigUseCase {
    pub fn new(settings: Arc<SettingsStore>, services: Arc<ServiceStore>) -> Self {
        Self { settings, services }
    }

    pub async fn execute(&self) -> ConfigDocument {
        ConfigDocument {
            settings: self.settings.snapshot().await,
            services: self.services.get_all().await,
        }
    }

    #[instrument(skip(self))]
    pub async fn render(&self, format: DocumentFormat) -> Result<String, DomainError> {
        let document = self.execute().await;
        format.render(&document)
    }
}
