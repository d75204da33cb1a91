use dashlet_domain::{ExternalConfig, ReconcilePolicy, SettingsMergePolicy};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::ports::ExternalConfigSource;
use crate::services::{ServiceStore, SettingsStore};

/// Startup load of the external config.
///
/// Settings merge with the initial-load policy. Services take the external
/// list verbatim when nothing was persisted yet, otherwise they are merged
/// without removing local entries. Every failure is logged and the stores
/// keep their current state.
pub struct LoadExternalConfigUseCase {
    source: Arc<dyn ExternalConfigSource>,
    settings: Arc<SettingsStore>,
    services: Arc<ServiceStore>,
}

impl LoadExternalConfigUseCase {
    pub fn new(
        source: Arc<dyn ExternalConfigSource>,
        settings: Arc<SettingsStore>,
        services: Arc<ServiceStore>,
    ) -> Self {
        Self {
            source,
            settings,
            services,
        }
    }

    #[instrument(skip(self), fields(source = %self.source.describe()))]
    pub async fn execute(&self) -> Option<ExternalConfig> {
        let document = match self.source.fetch().await {
            Ok(document) => document,
            Err(e) => {
                warn!(error = %e, "External config unavailable, continuing with local state");
                return None;
            }
        };

        let config = match ExternalConfig::from_value(&document) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "External config ignored");
                return None;
            }
        };

        for issue in &config.issues {
            warn!(issue = %issue, "External config entry ignored");
        }

        if let Some(settings) = &config.settings {
            if let Err(e) = self
                .settings
                .merge_external(settings, SettingsMergePolicy::InitialLoad)
                .await
            {
                warn!(error = %e, "Failed to merge external settings");
            }
        }

        if let Some(services) = &config.services {
            let policy = self.service_policy().await;
            match self.services.reconcile(services, policy).await {
                Ok(()) => info!(policy = ?policy, count = services.len(), "External services loaded"),
                Err(e) => warn!(error = %e, "Failed to reconcile external services"),
            }
        }

        Some(config)
    }

    async fn service_policy(&self) -> ReconcilePolicy {
        if !self.services.has_persisted().await || self.services.get_all().await.is_empty() {
            ReconcilePolicy::FirstRun
        } else {
            ReconcilePolicy::Merge
        }
    }
}
