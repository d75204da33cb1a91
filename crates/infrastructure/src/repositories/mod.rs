pub mod local_state;
pub mod service_repository;
pub mod settings_repository;

pub use local_state::LocalStateTable;
pub use service_repository::SqliteServiceRepository;
pub use settings_repository::SqliteSettingsRepository;
