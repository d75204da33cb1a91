use dashlet_domain::{
    snapshot_of, DomainError, ExternalConfig, ReconcilePolicy, ServiceList, SettingsMap,
    SettingsMergePolicy,
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

use super::{ServiceStore, SettingsStore};
use crate::ports::ExternalConfigSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Idle,
    Polling,
}

/// What a single [`ConfigWatcher::check`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Another check was still in flight.
    Skipped,
    /// Fetch or parse failed; the previous snapshot is kept.
    Failed,
    /// First successful check; snapshot recorded, nothing applied.
    Baseline,
    Unchanged,
    /// Content changed and was applied to both stores.
    Applied,
    /// The watcher was stopped while the fetch was in flight.
    Discarded,
}

/// Polls an [`ExternalConfigSource`] and applies changed content to the
/// settings (watch update) and service (strict) stores.
///
/// Only one check runs at a time. Scheduling lives in the jobs crate; this
/// type owns the per-check state machine.
pub struct ConfigWatcher {
    source: Arc<dyn ExternalConfigSource>,
    settings: Arc<SettingsStore>,
    services: Arc<ServiceStore>,
    polling: AtomicBool,
    active: AtomicBool,
    /// Bumped on every `stop` so in-flight checks can tell they were cancelled.
    epoch: AtomicU64,
    last_snapshot: Mutex<Option<String>>,
}

struct PollGuard<'a>(&'a AtomicBool);

impl Drop for PollGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Committed store states waiting to be published. Publishing happens on
/// drop so every exit path out of `apply` announces what was committed.
struct StagedChanges<'a> {
    settings_store: &'a SettingsStore,
    services_store: &'a ServiceStore,
    settings: Option<SettingsMap>,
    services: Option<ServiceList>,
}

impl<'a> StagedChanges<'a> {
    fn new(settings_store: &'a SettingsStore, services_store: &'a ServiceStore) -> Self {
        Self {
            settings_store,
            services_store,
            settings: None,
            services: None,
        }
    }
}

impl Drop for StagedChanges<'_> {
    fn drop(&mut self) {
        if let Some(settings) = self.settings.take() {
            self.settings_store.publish(&settings);
        }
        if let Some(services) = self.services.take() {
            self.services_store.publish(&services);
        }
    }
}

impl ConfigWatcher {
    pub fn new(
        source: Arc<dyn ExternalConfigSource>,
        settings: Arc<SettingsStore>,
        services: Arc<ServiceStore>,
    ) -> Self {
        Self {
            source,
            settings,
            services,
            polling: AtomicBool::new(false),
            active: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            last_snapshot: Mutex::new(None),
        }
    }

    pub fn start(&self) {
        self.active.store(true, Ordering::Release);
        info!(source = %self.source.describe(), "Config watcher started");
    }

    /// Deactivates the watcher. A check already in flight completes its
    /// fetch but applies nothing.
    pub fn stop(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        if self.active.swap(false, Ordering::AcqRel) {
            info!("Config watcher stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn state(&self) -> WatcherState {
        if self.polling.load(Ordering::Acquire) {
            WatcherState::Polling
        } else {
            WatcherState::Idle
        }
    }

    pub fn last_snapshot(&self) -> Option<String> {
        self.lock_snapshot().clone()
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    #[instrument(skip(self))]
    pub async fn check(&self) -> CheckOutcome {
        if self
            .polling
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Previous check still in flight, skipping");
            return CheckOutcome::Skipped;
        }
        let _guard = PollGuard(&self.polling);
        let epoch = self.epoch.load(Ordering::Acquire);

        let fetched = self.source.fetch().await;

        if self.epoch.load(Ordering::Acquire) != epoch {
            debug!("Watcher stopped during fetch, discarding result");
            return CheckOutcome::Discarded;
        }

        let document = match fetched {
            Ok(document) => document,
            Err(e) => {
                warn!(error = %e, "External config fetch failed");
                return CheckOutcome::Failed;
            }
        };

        let config = match ExternalConfig::from_value(&document) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "External config is not usable");
                return CheckOutcome::Failed;
            }
        };

        let snapshot = snapshot_of(&document);
        {
            let mut last = self.lock_snapshot();
            match last.as_deref() {
                None => {
                    *last = Some(snapshot);
                    debug!("Recorded baseline external config snapshot");
                    return CheckOutcome::Baseline;
                }
                Some(previous) if previous == snapshot => return CheckOutcome::Unchanged,
                Some(_) => {}
            }
        }

        for issue in &config.issues {
            warn!(issue = %issue, "External config entry ignored");
        }

        if let Err(e) = self.apply(&config).await {
            warn!(error = %e, "Failed to apply external config change");
            return CheckOutcome::Failed;
        }

        *self.lock_snapshot() = Some(snapshot);
        info!("External config change applied");
        CheckOutcome::Applied
    }

    /// Settings first, then services. Observers hear about both only after
    /// both are persisted; a store whose stage committed is always
    /// announced, even if the next stage fails or the check is dropped.
    async fn apply(&self, config: &ExternalConfig) -> Result<(), DomainError> {
        let mut staged = StagedChanges::new(&self.settings, &self.services);

        if let Some(settings) = &config.settings {
            let merged = self
                .settings
                .stage_external(settings, SettingsMergePolicy::WatchUpdate)
                .await?;
            staged.settings = Some(merged);
        }
        if let Some(services) = &config.services {
            let reconciled = self
                .services
                .stage_reconcile(services, ReconcilePolicy::Strict)
                .await?;
            staged.services = Some(reconciled);
        }
        Ok(())
    }

    fn lock_snapshot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.last_snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
