pub mod config_watch;

pub use config_watch::ConfigWatchJob;
