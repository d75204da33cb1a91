use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// The fixed set of recognized display/behavior options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SettingKey {
    #[serde(rename = "theme")]
    Theme,
    #[serde(rename = "accentColor")]
    AccentColor,
    #[serde(rename = "blur")]
    Blur,
    #[serde(rename = "animations")]
    Animations,
    #[serde(rename = "openNewTab")]
    OpenNewTab,
    #[serde(rename = "layout")]
    Layout,
    #[serde(rename = "wallpaper")]
    Wallpaper,
    #[serde(rename = "customCSS")]
    CustomCss,
    #[serde(rename = "disableDragDrop")]
    DisableDragDrop,
    #[serde(rename = "dragDelay")]
    DragDelay,
    #[serde(rename = "searchEnabled")]
    SearchEnabled,
    #[serde(rename = "searchProvider")]
    SearchProvider,
    #[serde(rename = "footerText")]
    FooterText,
    #[serde(rename = "footerColor")]
    FooterColor,
    #[serde(rename = "appTitle")]
    AppTitle,
    #[serde(rename = "greeting")]
    Greeting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Text,
    Flag,
    Number,
}

impl SettingKey {
    pub const ALL: [SettingKey; 16] = [
        SettingKey::Theme,
        SettingKey::AccentColor,
        SettingKey::Blur,
        SettingKey::Animations,
        SettingKey::OpenNewTab,
        SettingKey::Layout,
        SettingKey::Wallpaper,
        SettingKey::CustomCss,
        SettingKey::DisableDragDrop,
        SettingKey::DragDelay,
        SettingKey::SearchEnabled,
        SettingKey::SearchProvider,
        SettingKey::FooterText,
        SettingKey::FooterColor,
        SettingKey::AppTitle,
        SettingKey::Greeting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::Theme => "theme",
            SettingKey::AccentColor => "accentColor",
            SettingKey::Blur => "blur",
            SettingKey::Animations => "animations",
            SettingKey::OpenNewTab => "openNewTab",
            SettingKey::Layout => "layout",
            SettingKey::Wallpaper => "wallpaper",
            SettingKey::CustomCss => "customCSS",
            SettingKey::DisableDragDrop => "disableDragDrop",
            SettingKey::DragDelay => "dragDelay",
            SettingKey::SearchEnabled => "searchEnabled",
            SettingKey::SearchProvider => "searchProvider",
            SettingKey::FooterText => "footerText",
            SettingKey::FooterColor => "footerColor",
            SettingKey::AppTitle => "appTitle",
            SettingKey::Greeting => "greeting",
        }
    }

    pub fn kind(&self) -> SettingKind {
        match self {
            SettingKey::Blur
            | SettingKey::Animations
            | SettingKey::OpenNewTab
            | SettingKey::DisableDragDrop
            | SettingKey::SearchEnabled => SettingKind::Flag,
            SettingKey::DragDelay => SettingKind::Number,
            _ => SettingKind::Text,
        }
    }

    pub fn default_value(&self) -> SettingValue {
        match self {
            SettingKey::Theme => SettingValue::text("system"),
            SettingKey::AccentColor => SettingValue::text("#3b82f6"),
            SettingKey::Blur => SettingValue::Flag(true),
            SettingKey::Animations => SettingValue::Flag(true),
            SettingKey::OpenNewTab => SettingValue::Flag(true),
            SettingKey::Layout => SettingValue::text("grid"),
            SettingKey::Wallpaper => SettingValue::text(""),
            SettingKey::CustomCss => SettingValue::text(""),
            SettingKey::DisableDragDrop => SettingValue::Flag(false),
            SettingKey::DragDelay => SettingValue::Number(Number::from(0)),
            SettingKey::SearchEnabled => SettingValue::Flag(true),
            SettingKey::SearchProvider => SettingValue::text(""),
            SettingKey::FooterText => SettingValue::text("Powered by Dashlet"),
            SettingKey::FooterColor => SettingValue::text("rgba(255, 255, 255, 0.4)"),
            SettingKey::AppTitle => SettingValue::text("Dashlet"),
            SettingKey::Greeting => SettingValue::text("Lightweight dashboard for small apps"),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingKey::ALL
            .iter()
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| DomainError::UnknownSetting(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Flag(bool),
    Number(Number),
    Text(String),
}

impl SettingValue {
    pub fn text(s: impl Into<String>) -> Self {
        SettingValue::Text(s.into())
    }

    pub fn kind(&self) -> SettingKind {
        match self {
            SettingValue::Flag(_) => SettingKind::Flag,
            SettingValue::Number(_) => SettingKind::Number,
            SettingValue::Text(_) => SettingKind::Text,
        }
    }

    /// Only the empty string is empty; `false` and `0` are real values.
    pub fn is_empty(&self) -> bool {
        matches!(self, SettingValue::Text(s) if s.is_empty())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SettingValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Converts a JSON value, returning `None` for `null` and anything that
    /// is not a bool, number or string.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(SettingValue::Flag(*b)),
            Value::Number(n) => Some(SettingValue::Number(n.clone())),
            Value::String(s) => Some(SettingValue::Text(s.clone())),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            SettingValue::Flag(b) => Value::Bool(*b),
            SettingValue::Number(n) => Value::Number(n.clone()),
            SettingValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Flag(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Number(Number::from(value))
    }
}

/// An entry dropped while reading a settings object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSetting {
    pub key: String,
    pub reason: String,
}

/// A partial settings object as found in external, imported or persisted
/// data. Unknown keys and type mismatches never make it in; they are
/// recorded in `skipped`. `None` marks an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialSettings {
    values: BTreeMap<SettingKey, Option<SettingValue>>,
    skipped: Vec<SkippedSetting>,
}

impl PartialSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_object(obj: &Map<String, Value>) -> Self {
        let mut partial = Self::new();
        for (raw_key, raw_value) in obj {
            let key = match raw_key.parse::<SettingKey>() {
                Ok(key) => key,
                Err(_) => {
                    partial.skipped.push(SkippedSetting {
                        key: raw_key.clone(),
                        reason: "unrecognized key".to_string(),
                    });
                    continue;
                }
            };

            if raw_value.is_null() {
                partial.values.insert(key, None);
                continue;
            }

            match SettingValue::from_json(raw_value) {
                Some(value) if value.kind() == key.kind() => {
                    partial.values.insert(key, Some(value));
                }
                _ => partial.skipped.push(SkippedSetting {
                    key: raw_key.clone(),
                    reason: format!("expected a {:?} value", key.kind()),
                }),
            }
        }
        partial
    }

    pub fn with(mut self, key: SettingKey, value: impl Into<SettingValue>) -> Self {
        self.values.insert(key, Some(value.into()));
        self
    }

    pub fn with_null(mut self, key: SettingKey) -> Self {
        self.values.insert(key, None);
        self
    }

    pub fn get(&self, key: SettingKey) -> Option<&Option<SettingValue>> {
        self.values.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SettingKey, Option<&SettingValue>)> {
        self.values.iter().map(|(k, v)| (*k, v.as_ref()))
    }

    pub fn skipped(&self) -> &[SkippedSetting] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsMergePolicy {
    /// defaults ⊳ external ⊳ persisted local
    InitialLoad,
    /// non-empty external values overwrite local ones
    WatchUpdate,
}

/// A complete settings map: every recognized key always has a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SettingsMap(BTreeMap<SettingKey, SettingValue>);

impl Default for SettingsMap {
    fn default() -> Self {
        Self::defaults()
    }
}

impl SettingsMap {
    pub fn defaults() -> Self {
        Self(
            SettingKey::ALL
                .iter()
                .map(|k| (*k, k.default_value()))
                .collect(),
        )
    }

    /// Builds the map from a persisted blob: defaults overlaid by every
    /// recognized, correctly typed key. Everything else is reported.
    pub fn from_persisted(value: &Value) -> (Self, Vec<SkippedSetting>) {
        let Some(obj) = value.as_object() else {
            return (
                Self::defaults(),
                vec![SkippedSetting {
                    key: "*".to_string(),
                    reason: "persisted settings are not an object".to_string(),
                }],
            );
        };
        let partial = PartialSettings::from_object(obj);
        let mut map = Self::defaults();
        map.overlay(&partial);
        (map, partial.skipped)
    }

    pub fn get(&self, key: SettingKey) -> &SettingValue {
        // Every key is populated by construction.
        &self.0[&key]
    }

    pub fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<(), DomainError> {
        if value.kind() != key.kind() {
            return Err(DomainError::Validation(format!(
                "{} expects a {:?} value",
                key,
                key.kind()
            )));
        }
        self.0.insert(key, value);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (SettingKey, &SettingValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    /// Copies every non-null value of `partial`.
    pub fn overlay(&mut self, partial: &PartialSettings) {
        for (key, value) in partial.iter() {
            if let Some(value) = value {
                self.0.insert(key, value.clone());
            }
        }
    }

    /// Copies the values of `partial` that are neither null nor empty.
    pub fn overlay_non_empty(&mut self, partial: &PartialSettings) {
        for (key, value) in partial.iter() {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                self.0.insert(key, value.clone());
            }
        }
    }

    /// Merges an external partial map into a new settings map.
    ///
    /// `persisted` holds the keys the user has actually stored locally; it is
    /// only consulted for [`SettingsMergePolicy::InitialLoad`].
    pub fn merge_external(
        &self,
        external: &PartialSettings,
        policy: SettingsMergePolicy,
        persisted: &PartialSettings,
    ) -> SettingsMap {
        match policy {
            SettingsMergePolicy::InitialLoad => {
                let mut merged = Self::defaults();
                merged.overlay(external);
                merged.overlay(persisted);
                merged
            }
            SettingsMergePolicy::WatchUpdate => {
                let mut merged = self.clone();
                merged.overlay_non_empty(external);
                merged
            }
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), v.to_json()))
                .collect(),
        )
    }

    /// The same map viewed as a partial with every key set.
    pub fn to_partial(&self) -> PartialSettings {
        let mut partial = PartialSettings::new();
        for (key, value) in self.iter() {
            partial = partial.with(key, value.clone());
        }
        partial
    }
}
