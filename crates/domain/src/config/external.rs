use serde::{Deserialize, Serialize};

/// Where the declarative dashboard config lives and how often it is polled.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExternalSourceConfig {
    /// File path or `http(s)://` URL. Empty disables the external source.
    #[serde(default = "default_location")]
    pub location: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_true")]
    pub watch: bool,
}

impl Default for ExternalSourceConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            poll_interval_ms: default_poll_interval_ms(),
            watch: true,
        }
    }
}

impl ExternalSourceConfig {
    pub fn is_enabled(&self) -> bool {
        !self.location.trim().is_empty()
    }
}

fn default_location() -> String {
    "public/config.json".to_string()
}

fn default_poll_interval_ms() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}
