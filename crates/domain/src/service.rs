use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::DomainError;

/// A dashboard shortcut. `id` is the stable identity key within a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub type ServiceList = Vec<Service>;

impl Service {
    /// Applies the fields present in `patch`, leaving the id untouched.
    pub fn apply_patch(&mut self, patch: &ServicePatch) {
        if let Some(url) = &patch.url {
            self.url = url.clone();
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(icon) = &patch.icon {
            self.icon = Some(icon.clone());
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
    }
}

/// Partial service used by `add` and `update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePatch {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A service as declared by the external config or an import document.
/// `id` is optional there; everything else mirrors [`Service`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalService {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExternalService {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: url.into(),
            name: None,
            icon: None,
            description: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Validates one entry of a `services` array.
    ///
    /// `url` is required and must be a non-empty string. Optional fields of
    /// the wrong type are treated as absent; an empty `id` counts as missing.
    pub fn from_value(value: &Value) -> Result<Self, DomainError> {
        let obj = value
            .as_object()
            .ok_or_else(|| DomainError::Validation("service entry is not an object".to_string()))?;

        let url = match obj.get("url").and_then(Value::as_str) {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => {
                return Err(DomainError::Validation(
                    "service entry is missing a url".to_string(),
                ))
            }
        };

        let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
        let id = match obj.get("id") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        Ok(Self {
            id,
            url,
            name: text("name"),
            icon: text("icon"),
            description: text("description"),
        })
    }

    pub fn to_service(&self, id: String) -> Service {
        Service {
            id,
            url: self.url.clone(),
            name: self.name.clone().unwrap_or_else(|| self.url.clone()),
            icon: self.icon.clone(),
            description: self.description.clone(),
        }
    }
}

impl From<&Service> for ExternalService {
    fn from(service: &Service) -> Self {
        Self {
            id: Some(service.id.clone()),
            url: service.url.clone(),
            name: Some(service.name.clone()),
            icon: service.icon.clone(),
            description: service.description.clone(),
        }
    }
}

/// Built-in list used when nothing has ever been persisted.
pub fn default_services() -> ServiceList {
    vec![
        Service {
            id: "1".to_string(),
            url: "https://github.com".to_string(),
            name: "GitHub".to_string(),
            icon: Some("https://github.githubassets.com/favicons/favicon.png".to_string()),
            description: Some("Code hosting platform".to_string()),
        },
        Service {
            id: "2".to_string(),
            url: "https://youtube.com".to_string(),
            name: "YouTube".to_string(),
            icon: Some(
                "https://www.youtube.com/s/desktop/10c3d9b4/img/favicon_144x144.png".to_string(),
            ),
            description: Some("Video sharing".to_string()),
        },
        Service {
            id: "3".to_string(),
            url: "https://reddit.com".to_string(),
            name: "Reddit".to_string(),
            icon: Some(
                "https://www.redditstatic.com/desktop2x/img/favicon/favicon-96x96.png".to_string(),
            ),
            description: Some("Front page of the internet".to_string()),
        },
    ]
}
