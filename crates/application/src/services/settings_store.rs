use dashlet_domain::{
    DomainError, PartialSettings, SettingKey, SettingValue, SettingsMap, SettingsMergePolicy,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::subscribers::{Subscribers, Subscription};
use crate::ports::SettingsRepository;

struct SettingsState {
    current: SettingsMap,
    /// Keys the user has actually stored, as read at load time and
    /// refreshed on every save.
    persisted: PartialSettings,
}

/// Owns the current settings map and keeps it in sync with the repository.
///
/// Every mutation persists before it is committed in memory, so a failed
/// save leaves the visible state untouched. Writers are serialized by the
/// state lock being held across the save.
pub struct SettingsStore {
    repo: Arc<dyn SettingsRepository>,
    state: RwLock<SettingsState>,
    subscribers: Subscribers<SettingsMap>,
}

impl SettingsStore {
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self {
            repo,
            state: RwLock::new(SettingsState {
                current: SettingsMap::defaults(),
                persisted: PartialSettings::new(),
            }),
            subscribers: Subscribers::new(),
        }
    }

    /// Reads the persisted blob over the defaults. Unrecognized keys are
    /// dropped and the cleaned map written back.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<SettingsMap, DomainError> {
        let mut state = self.state.write().await;

        let Some(raw) = self.repo.load().await? else {
            debug!("No persisted settings, using defaults");
            state.current = SettingsMap::defaults();
            state.persisted = PartialSettings::new();
            return Ok(state.current.clone());
        };

        let (map, dropped) = SettingsMap::from_persisted(&raw);
        let persisted = raw
            .as_object()
            .map(PartialSettings::from_object)
            .unwrap_or_default();

        if !dropped.is_empty() {
            for entry in &dropped {
                info!(key = %entry.key, reason = %entry.reason, "Dropping persisted setting");
            }
            self.repo.save(&map).await?;
        }

        state.current = map;
        state.persisted = persisted;
        Ok(state.current.clone())
    }

    pub async fn get(&self, key: SettingKey) -> SettingValue {
        self.state.read().await.current.get(key).clone()
    }

    pub async fn snapshot(&self) -> SettingsMap {
        self.state.read().await.current.clone()
    }

    #[instrument(skip(self, value))]
    pub async fn set(&self, key: SettingKey, value: SettingValue) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let mut next = state.current.clone();
        next.set(key, value)?;

        self.commit(&mut state, next).await?;
        let current = state.current.clone();
        drop(state);

        self.subscribers.notify(&current);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        self.commit(&mut state, SettingsMap::defaults()).await?;
        let current = state.current.clone();
        drop(state);

        info!("Settings reset to defaults");
        self.subscribers.notify(&current);
        Ok(())
    }

    /// Current settings as a pretty-printed JSON object.
    pub async fn export_snapshot(&self) -> Result<String, DomainError> {
        let current = self.snapshot().await;
        serde_json::to_string_pretty(&current).map_err(|e| DomainError::Parse(e.to_string()))
    }

    /// Applies every recognized key of a JSON settings object.
    ///
    /// Anything other than a JSON object is rejected without touching the
    /// current state. Returns the number of keys applied.
    #[instrument(skip(self, raw))]
    pub async fn import_snapshot(&self, raw: &str) -> Result<usize, DomainError> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| DomainError::ImportRejected(format!("invalid JSON: {}", e)))?;
        let obj = value.as_object().ok_or_else(|| {
            DomainError::ImportRejected("settings must be a JSON object".to_string())
        })?;

        let partial = PartialSettings::from_object(obj);
        for skipped in partial.skipped() {
            warn!(key = %skipped.key, reason = %skipped.reason, "Ignoring imported setting");
        }
        self.apply_partial(&partial).await
    }

    /// Overwrites the current value of every non-null key in `partial`,
    /// persisting and notifying once.
    pub async fn apply_partial(&self, partial: &PartialSettings) -> Result<usize, DomainError> {
        let applied = partial.iter().filter(|(_, v)| v.is_some()).count();

        let mut state = self.state.write().await;
        let mut next = state.current.clone();
        next.overlay(partial);

        self.commit(&mut state, next).await?;
        let current = state.current.clone();
        drop(state);

        self.subscribers.notify(&current);
        Ok(applied)
    }

    /// Merges an external partial settings map. Persists and notifies once.
    #[instrument(skip(self, external))]
    pub async fn merge_external(
        &self,
        external: &PartialSettings,
        policy: SettingsMergePolicy,
    ) -> Result<(), DomainError> {
        let merged = self.stage_external(external, policy).await?;
        self.subscribers.notify(&merged);
        Ok(())
    }

    /// Same as [`merge_external`](Self::merge_external) without notifying.
    /// The caller is responsible for publishing the returned map.
    pub(crate) async fn stage_external(
        &self,
        external: &PartialSettings,
        policy: SettingsMergePolicy,
    ) -> Result<SettingsMap, DomainError> {
        let mut state = self.state.write().await;
        let merged = state
            .current
            .merge_external(external, policy, &state.persisted);

        self.commit(&mut state, merged).await?;
        debug!(policy = ?policy, keys = external.len(), "External settings merged");
        Ok(state.current.clone())
    }

    pub(crate) fn publish(&self, current: &SettingsMap) {
        self.subscribers.notify(current);
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SettingsMap) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(listener)
    }

    async fn commit(&self, state: &mut SettingsState, next: SettingsMap) -> Result<(), DomainError> {
        self.repo.save(&next).await?;
        state.persisted = next.to_partial();
        state.current = next;
        Ok(())
    }
}
