//! Dashlet Infrastructure Layer
//!
//! SQLite persistence for the local state and the file/HTTP sources of the
//! external config document.
pub mod database;
pub mod external;
pub mod repositories;
