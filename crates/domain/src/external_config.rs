use serde::Serialize;
use serde_json::Value;

use crate::errors::DomainError;
use crate::service::{ExternalService, Service};
use crate::settings::{PartialSettings, SettingsMap};

/// The externally supplied `{settings?, services?}` document.
///
/// Built from an already-parsed [`Value`]; the engine never mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalConfig {
    pub settings: Option<PartialSettings>,
    pub services: Option<Vec<ExternalService>>,
    /// Human readable notes about entries that were dropped.
    pub issues: Vec<String>,
}

impl ExternalConfig {
    /// Lenient parse used for the watched/loaded external file.
    ///
    /// Only a non-object top level is an error. A malformed `settings` or
    /// `services` section is ignored, and individual invalid services are
    /// skipped; all of it is reported in `issues`.
    pub fn from_value(value: &Value) -> Result<Self, DomainError> {
        let obj = value.as_object().ok_or_else(|| {
            DomainError::Parse("top-level document is not an object".to_string())
        })?;

        let mut config = ExternalConfig::default();

        match obj.get("settings") {
            None | Some(Value::Null) => {}
            Some(Value::Object(map)) => {
                let partial = PartialSettings::from_object(map);
                for skipped in partial.skipped() {
                    config
                        .issues
                        .push(format!("settings.{}: {}", skipped.key, skipped.reason));
                }
                config.settings = Some(partial);
            }
            Some(_) => config
                .issues
                .push("settings: expected an object, section ignored".to_string()),
        }

        match obj.get("services") {
            None | Some(Value::Null) => {}
            Some(Value::Array(entries)) => {
                let services = config.collect_services(entries);
                config.services = Some(services);
            }
            Some(_) => config
                .issues
                .push("services: expected an array, section ignored".to_string()),
        }

        Ok(config)
    }

    /// Strict parse used by user imports: the top-level shape must be valid
    /// or nothing is applied. Individual services lacking a url are still
    /// skipped rather than failing the batch.
    pub fn from_import(value: &Value) -> Result<Self, DomainError> {
        let obj = value.as_object().ok_or_else(|| {
            DomainError::ImportRejected("document is not an object".to_string())
        })?;

        if let Some(settings) = obj.get("settings") {
            if !settings.is_object() && !settings.is_null() {
                return Err(DomainError::ImportRejected(
                    "settings must be an object".to_string(),
                ));
            }
        }
        if let Some(services) = obj.get("services") {
            if !services.is_array() && !services.is_null() {
                return Err(DomainError::ImportRejected(
                    "services must be an array".to_string(),
                ));
            }
        }

        Self::from_value(value).map_err(|e| DomainError::ImportRejected(e.to_string()))
    }

    fn collect_services(&mut self, entries: &[Value]) -> Vec<ExternalService> {
        entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match ExternalService::from_value(entry) {
                Ok(service) => Some(service),
                Err(e) => {
                    self.issues.push(format!("services[{}]: {}", index, e));
                    None
                }
            })
            .collect()
    }
}

/// Canonical serialized form of a fetched document, used only to detect
/// changes between polls. Object keys are emitted in sorted order at every
/// depth so key order in the source file does not matter.
pub fn snapshot_of(value: &Value) -> String {
    canonical(value).to_string()
}

fn canonical(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            Value::Object(
                keys.into_iter()
                    .map(|k| (k.clone(), canonical(&map[k])))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        other => other.clone(),
    }
}

/// The `{settings, services}` document produced by export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigDocument {
    pub settings: SettingsMap,
    pub services: Vec<Service>,
}
