use dashlet_domain::{reconcile, DocumentFormat, DomainError, ExternalConfig, ReconcilePolicy};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::services::{ServiceStore, SettingsStore};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub settings_applied: usize,
    /// `None` when the document had no `services` section.
    pub services_imported: Option<usize>,
    pub issues: Vec<String>,
}

/// Imports a `{settings, services}` document as an overwrite.
///
/// The whole document is parsed and shape-checked before either store is
/// touched. The service list, when present, replaces the local one.
pub struct ImportConfigUseCase {
    settings: Arc<SettingsStore>,
    services: Arc<ServiceStore>,
}

impl ImportConfigUseCase {
    pub fn new(settings: Arc<SettingsStore>, services: Arc<ServiceStore>) -> Self {
        Self { settings, services }
    }

    #[instrument(skip(self, raw), fields(bytes = raw.len()))]
    pub async fn execute(
        &self,
        raw: &str,
        format: DocumentFormat,
    ) -> Result<ImportSummary, DomainError> {
        let document = format
            .parse(raw)
            .map_err(|e| DomainError::ImportRejected(e.to_string()))?;
        let config = ExternalConfig::from_import(&document)?;

        let mut summary = ImportSummary {
            issues: config.issues.clone(),
            ..Default::default()
        };
        for issue in &summary.issues {
            warn!(issue = %issue, "Imported entry ignored");
        }

        if let Some(settings) = &config.settings {
            summary.settings_applied = self.settings.apply_partial(settings).await?;
        }

        if let Some(services) = &config.services {
            let list = reconcile(&[], services, ReconcilePolicy::FirstRun);
            summary.services_imported = Some(list.len());
            self.services.replace_all(list).await?;
        }

        info!(
            settings = summary.settings_applied,
            services = ?summary.services_imported,
            "Config imported"
        );
        Ok(summary)
    }
}
