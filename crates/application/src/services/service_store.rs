use dashlet_domain::{
    default_services, reconcile, DomainError, ExternalService, ReconcilePolicy, Service,
    ServiceList, ServicePatch,
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::subscribers::{Subscribers, Subscription};
use crate::ports::ServiceRepository;

struct ServiceState {
    services: ServiceList,
    /// Whether the list came from the repository rather than the defaults.
    persisted: bool,
}

/// Owns the ordered service list. Same persistence contract as
/// [`SettingsStore`](super::SettingsStore): save first, then commit, then notify.
pub struct ServiceStore {
    repo: Arc<dyn ServiceRepository>,
    state: RwLock<ServiceState>,
    subscribers: Subscribers<ServiceList>,
}

impl ServiceStore {
    pub fn new(repo: Arc<dyn ServiceRepository>) -> Self {
        Self {
            repo,
            state: RwLock::new(ServiceState {
                services: default_services(),
                persisted: false,
            }),
            subscribers: Subscribers::new(),
        }
    }

    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<ServiceList, DomainError> {
        let mut state = self.state.write().await;

        match self.repo.load().await? {
            Some(list) => {
                let deduped = dedupe_ids(list);
                debug!(count = deduped.len(), "Loaded persisted services");
                state.services = deduped;
                state.persisted = true;
            }
            None => {
                debug!("No persisted services, using defaults");
                state.services = default_services();
                state.persisted = false;
            }
        }
        Ok(state.services.clone())
    }

    /// True once a list has been loaded from or written to the repository.
    pub async fn has_persisted(&self) -> bool {
        self.state.read().await.persisted
    }

    pub async fn get_all(&self) -> ServiceList {
        self.state.read().await.services.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Service> {
        self.state
            .read()
            .await
            .services
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    /// Appends a new service with a generated id. `url` is required; `name`
    /// falls back to the url.
    #[instrument(skip(self, patch))]
    pub async fn add(&self, patch: ServicePatch) -> Result<Service, DomainError> {
        let url = patch
            .url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| DomainError::Validation("service url is required".to_string()))?;

        let mut state = self.state.write().await;
        let taken: HashSet<&str> = state.services.iter().map(|s| s.id.as_str()).collect();
        let id = generate_id(&taken);

        let service = Service {
            id,
            name: patch
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| url.clone()),
            url,
            icon: patch.icon.clone(),
            description: patch.description.clone(),
        };

        let mut next = state.services.clone();
        next.push(service.clone());
        self.commit(&mut state, next).await?;
        let current = state.services.clone();
        drop(state);

        info!(id = %service.id, url = %service.url, "Service added");
        self.subscribers.notify(&current);
        Ok(service)
    }

    /// Removes the service with `id`. Returns whether anything was removed.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        if !state.services.iter().any(|s| s.id == id) {
            return Ok(false);
        }

        let next: ServiceList = state
            .services
            .iter()
            .filter(|s| s.id != id)
            .cloned()
            .collect();
        self.commit(&mut state, next).await?;
        let current = state.services.clone();
        drop(state);

        self.subscribers.notify(&current);
        Ok(true)
    }

    /// Shallow-merges `patch` into the service with `id`. Returns the
    /// updated service, or `None` when the id is unknown.
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: &str,
        patch: &ServicePatch,
    ) -> Result<Option<Service>, DomainError> {
        if patch.url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            return Err(DomainError::Validation(
                "service url cannot be empty".to_string(),
            ));
        }

        let mut state = self.state.write().await;
        let Some(index) = state.services.iter().position(|s| s.id == id) else {
            return Ok(None);
        };

        let mut next = state.services.clone();
        next[index].apply_patch(patch);
        let updated = next[index].clone();

        self.commit(&mut state, next).await?;
        let current = state.services.clone();
        drop(state);

        self.subscribers.notify(&current);
        Ok(Some(updated))
    }

    /// Unconditionally overwrites the list. Later duplicates of an id are
    /// dropped.
    #[instrument(skip(self, services), fields(count = services.len()))]
    pub async fn replace_all(&self, services: ServiceList) -> Result<(), DomainError> {
        let next = dedupe_ids(services);

        let mut state = self.state.write().await;
        self.commit(&mut state, next).await?;
        let current = state.services.clone();
        drop(state);

        self.subscribers.notify(&current);
        Ok(())
    }

    /// Reorders the list to follow `ids`. Services missing from `ids` keep
    /// their relative order after the listed ones; unknown ids are ignored.
    #[instrument(skip(self, ids))]
    pub async fn reorder(&self, ids: &[String]) -> Result<(), DomainError> {
        let mut state = self.state.write().await;

        let mut remaining = state.services.clone();
        let mut next = Vec::with_capacity(remaining.len());
        for id in ids {
            if let Some(pos) = remaining.iter().position(|s| &s.id == id) {
                next.push(remaining.remove(pos));
            }
        }
        next.extend(remaining);

        self.commit(&mut state, next).await?;
        let current = state.services.clone();
        drop(state);

        self.subscribers.notify(&current);
        Ok(())
    }

    /// Reconciles the external list into the local one. Persists and
    /// notifies once.
    #[instrument(skip(self, external), fields(external = external.len()))]
    pub async fn reconcile(
        &self,
        external: &[ExternalService],
        policy: ReconcilePolicy,
    ) -> Result<(), DomainError> {
        let current = self.stage_reconcile(external, policy).await?;
        self.subscribers.notify(&current);
        Ok(())
    }

    pub(crate) async fn stage_reconcile(
        &self,
        external: &[ExternalService],
        policy: ReconcilePolicy,
    ) -> Result<ServiceList, DomainError> {
        let mut state = self.state.write().await;
        let before = state.services.len();
        let next = reconcile(&state.services, external, policy);

        self.commit(&mut state, next).await?;
        debug!(
            policy = ?policy,
            before,
            after = state.services.len(),
            "Services reconciled"
        );
        Ok(state.services.clone())
    }

    pub(crate) fn publish(&self, current: &ServiceList) {
        self.subscribers.notify(current);
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ServiceList) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(listener)
    }

    async fn commit(&self, state: &mut ServiceState, next: ServiceList) -> Result<(), DomainError> {
        self.repo.save(&next).await?;
        state.services = next;
        state.persisted = true;
        Ok(())
    }
}

fn dedupe_ids(services: ServiceList) -> ServiceList {
    let mut seen = HashSet::new();
    services
        .into_iter()
        .filter(|s| {
            let fresh = seen.insert(s.id.clone());
            if !fresh {
                warn!(id = %s.id, "Dropping service with duplicate id");
            }
            fresh
        })
        .collect()
}

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Millisecond timestamp in base36 followed by a random suffix.
fn generate_id(taken: &HashSet<&str>) -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let prefix = to_base36(millis);
    loop {
        let suffix: String = (0..8)
            .map(|_| BASE36[fastrand::usize(..BASE36.len())] as char)
            .collect();
        let id = format!("{}{}", prefix, suffix);
        if !taken.contains(id.as_str()) {
            return id;
        }
    }
}
