#![allow(dead_code)]

use async_trait::async_trait;
use dashlet_application::ports::{ExternalConfigSource, ServiceRepository, SettingsRepository};
use dashlet_domain::{DomainError, Service, SettingsMap};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};

#[derive(Clone, Default)]
pub struct MockSettingsRepository {
    stored: Arc<RwLock<Option<Value>>>,
    saves: Arc<AtomicU64>,
    should_fail: Arc<AtomicBool>,
}

impl MockSettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stored(value: Value) -> Self {
        Self {
            stored: Arc::new(RwLock::new(Some(value))),
            ..Default::default()
        }
    }

    pub async fn stored(&self) -> Option<Value> {
        self.stored.read().await.clone()
    }

    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SettingsRepository for MockSettingsRepository {
    async fn load(&self) -> Result<Option<Value>, DomainError> {
        Ok(self.stored.read().await.clone())
    }

    async fn save(&self, settings: &SettingsMap) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("mock save failure".to_string()));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.stored.write().await = Some(settings.to_json());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockServiceRepository {
    stored: Arc<RwLock<Option<Vec<Service>>>>,
    saves: Arc<AtomicU64>,
    should_fail: Arc<AtomicBool>,
    save_gate: Arc<RwLock<Option<Arc<Notify>>>>,
    save_entered: Arc<Notify>,
}

impl MockServiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stored(services: Vec<Service>) -> Self {
        Self {
            stored: Arc::new(RwLock::new(Some(services))),
            ..Default::default()
        }
    }

    pub async fn stored(&self) -> Option<Vec<Service>> {
        self.stored.read().await.clone()
    }

    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent saves block until the returned gate is notified.
    pub async fn hold_saves(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.save_gate.write().await = Some(Arc::clone(&gate));
        gate
    }

    /// Resolves once a held save has started.
    pub async fn wait_save_entered(&self) {
        self.save_entered.notified().await;
    }
}

#[async_trait]
impl ServiceRepository for MockServiceRepository {
    async fn load(&self) -> Result<Option<Vec<Service>>, DomainError> {
        Ok(self.stored.read().await.clone())
    }

    async fn save(&self, services: &[Service]) -> Result<(), DomainError> {
        let gate = self.save_gate.read().await.clone();
        if let Some(gate) = gate {
            self.save_entered.notify_one();
            gate.notified().await;
        }
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("mock save failure".to_string()));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.stored.write().await = Some(services.to_vec());
        Ok(())
    }
}

/// Serves a fixed document until replaced; queued results take priority.
/// With a gate installed, every fetch waits for `release()`.
#[derive(Clone)]
pub struct MockConfigSource {
    document: Arc<RwLock<Result<Value, DomainError>>>,
    queued: Arc<RwLock<VecDeque<Result<Value, DomainError>>>>,
    fetches: Arc<AtomicU64>,
    gate: Arc<RwLock<Option<Arc<Notify>>>>,
    entered: Arc<Notify>,
}

impl MockConfigSource {
    pub fn new(document: Value) -> Self {
        Self {
            document: Arc::new(RwLock::new(Ok(document))),
            queued: Arc::new(RwLock::new(VecDeque::new())),
            fetches: Arc::new(AtomicU64::new(0)),
            gate: Arc::new(RwLock::new(None)),
            entered: Arc::new(Notify::new()),
        }
    }

    pub fn failing() -> Self {
        let source = Self::new(Value::Null);
        Self {
            document: Arc::new(RwLock::new(Err(DomainError::Fetch(
                "connection refused".to_string(),
            )))),
            ..source
        }
    }

    pub async fn set_document(&self, document: Value) {
        *self.document.write().await = Ok(document);
    }

    pub async fn set_error(&self, error: DomainError) {
        *self.document.write().await = Err(error);
    }

    pub async fn push_result(&self, result: Result<Value, DomainError>) {
        self.queued.write().await.push_back(result);
    }

    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Makes subsequent fetches block until `release` is notified.
    pub async fn install_gate(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.write().await = Some(Arc::clone(&gate));
        gate
    }

    /// Resolves once a gated fetch has started.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }
}

#[async_trait]
impl ExternalConfigSource for MockConfigSource {
    async fn fetch(&self) -> Result<Value, DomainError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.read().await.clone();
        if let Some(gate) = gate {
            self.entered.notify_one();
            gate.notified().await;
        }

        if let Some(result) = self.queued.write().await.pop_front() {
            return result;
        }
        self.document.read().await.clone()
    }

    fn describe(&self) -> String {
        "mock://config".to_string()
    }
}
