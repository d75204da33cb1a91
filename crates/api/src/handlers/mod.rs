pub mod config;
pub mod health;
pub mod services;
pub mod settings;

pub use health::health_check;
