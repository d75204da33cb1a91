use dashlet_application::services::{CheckOutcome, WatcherState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatQuery {
    /// `json` (default) or `yaml`.
    pub format: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    pub outcome: &'static str,
}

impl CheckResponse {
    pub fn from_outcome(outcome: CheckOutcome) -> Self {
        let outcome = match outcome {
            CheckOutcome::Skipped => "skipped",
            CheckOutcome::Failed => "failed",
            CheckOutcome::Baseline => "baseline",
            CheckOutcome::Unchanged => "unchanged",
            CheckOutcome::Applied => "applied",
            CheckOutcome::Discarded => "discarded",
        };
        Self { outcome }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WatchStatusResponse {
    pub enabled: bool,
    pub active: bool,
    pub state: &'static str,
    pub source: Option<String>,
    pub has_baseline: bool,
}

impl WatchStatusResponse {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            active: false,
            state: "idle",
            source: None,
            has_baseline: false,
        }
    }

    pub fn state_name(state: WatcherState) -> &'static str {
        match state {
            WatcherState::Idle => "idle",
            WatcherState::Polling => "polling",
        }
    }
}
