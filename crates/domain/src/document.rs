use serde::Serialize;
use serde_json::Value;

use crate::errors::DomainError;

/// Serialization formats accepted for external, exported and imported
/// config documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Guesses the format from a file path or URL path. Anything that does
    /// not end in `.yaml`/`.yml` is JSON.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            DocumentFormat::Yaml
        } else {
            DocumentFormat::Json
        }
    }

    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type.split(';').next()?.trim().to_ascii_lowercase();
        match mime.as_str() {
            "application/json" | "text/json" => Some(DocumentFormat::Json),
            "application/yaml" | "application/x-yaml" | "text/yaml" | "text/x-yaml" => {
                Some(DocumentFormat::Yaml)
            }
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentFormat::Json => "application/json",
            DocumentFormat::Yaml => "application/yaml",
        }
    }

    pub fn parse(&self, text: &str) -> Result<Value, DomainError> {
        match self {
            DocumentFormat::Json => {
                serde_json::from_str(text).map_err(|e| DomainError::Parse(e.to_string()))
            }
            DocumentFormat::Yaml => {
                serde_yaml_ng::from_str(text).map_err(|e| DomainError::Parse(e.to_string()))
            }
        }
    }

    pub fn render<T: Serialize>(&self, document: &T) -> Result<String, DomainError> {
        match self {
            DocumentFormat::Json => serde_json::to_string_pretty(document)
                .map_err(|e| DomainError::Parse(e.to_string())),
            DocumentFormat::Yaml => {
                serde_yaml_ng::to_string(document).map_err(|e| DomainError::Parse(e.to_string()))
            }
        }
    }
}
