//! Dashlet Domain Layer
pub mod config;
pub mod document;
pub mod errors;
pub mod external_config;
pub mod reconcile;
pub mod service;
pub mod settings;

pub use config::{CliOverrides, Config};
pub use document::DocumentFormat;
pub use errors::DomainError;
pub use external_config::{snapshot_of, ConfigDocument, ExternalConfig};
pub use reconcile::{reconcile, ReconcilePolicy};
pub use service::{default_services, ExternalService, Service, ServiceList, ServicePatch};
pub use settings::{
    PartialSettings, SettingKey, SettingKind, SettingValue, SettingsMap, SettingsMergePolicy,
    SkippedSetting,
};
