//! Dashlet Application Layer
//!
//! Stores, the external config watcher and the use cases that drive them.
//! Persistence and the external source are reached only through [`ports`].
pub mod ports;
pub mod services;
pub mod use_cases;
