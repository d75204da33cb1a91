use dashlet_application::services::{ConfigWatcher, ServiceStore, SettingsStore};
use dashlet_application::use_cases::{ExportConfigUseCase, ImportConfigUseCase};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<SettingsStore>,
    pub services: Arc<ServiceStore>,
    pub export_config: Arc<ExportConfigUseCase>,
    pub import_config: Arc<ImportConfigUseCase>,
    /// `None` when no external config location is configured.
    pub watcher: Option<Arc<ConfigWatcher>>,
}

impl AppState {
    pub fn new(
        settings: Arc<SettingsStore>,
        services: Arc<ServiceStore>,
        watcher: Option<Arc<ConfigWatcher>>,
    ) -> Self {
        Self {
            export_config: Arc::new(ExportConfigUseCase::new(
                settings.clone(),
                services.clone(),
            )),
            import_config: Arc::new(ImportConfigUseCase::new(
                settings.clone(),
                services.clone(),
            )),
            settings,
            services,
            watcher,
        }
    }
}
