pub mod config;
pub mod service;
pub mod settings;

pub use config::{CheckResponse, FormatQuery, WatchStatusResponse};
pub use service::{CreateServiceRequest, ReorderServicesRequest};
pub use settings::{SettingsImportResponse, UpdateSettingRequest};
