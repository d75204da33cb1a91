mod config_watcher;
mod service_store;
mod settings_store;
mod subscribers;

pub use config_watcher::{CheckOutcome, ConfigWatcher, WatcherState};
pub use service_store::ServiceStore;
pub use settings_store::SettingsStore;
pub use subscribers::{Subscribers, Subscription};
