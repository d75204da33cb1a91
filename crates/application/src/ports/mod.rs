mod external_config_source;
mod service_repository;
mod settings_repository;

pub use external_config_source::ExternalConfigSource;
pub use service_repository::ServiceRepository;
pub use settings_repository::SettingsRepository;
