use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Failed to fetch external config: {0}")]
    Fetch(String),

    #[error("Failed to parse external config: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Import rejected: {0}")]
    ImportRejected(String),

    #[error("Unknown setting key: {0}")]
    UnknownSetting(String),

    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

