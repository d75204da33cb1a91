#![allow(dead_code)]

use async_trait::async_trait;
use dashlet_application::ports::{ExternalConfigSource, ServiceRepository, SettingsRepository};
use dashlet_domain::{DomainError, Service, SettingsMap};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemorySettingsRepository {
    stored: Arc<RwLock<Option<Value>>>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn load(&self) -> Result<Option<Value>, DomainError> {
        Ok(self.stored.read().await.clone())
    }

    async fn save(&self, settings: &SettingsMap) -> Result<(), DomainError> {
        *self.stored.write().await = Some(settings.to_json());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryServiceRepository {
    stored: Arc<RwLock<Option<Vec<Service>>>>,
    saves: Arc<AtomicU64>,
}

impl InMemoryServiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceRepository for InMemoryServiceRepository {
    async fn load(&self) -> Result<Option<Vec<Service>>, DomainError> {
        Ok(self.stored.read().await.clone())
    }

    async fn save(&self, services: &[Service]) -> Result<(), DomainError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.stored.write().await = Some(services.to_vec());
        Ok(())
    }
}

#[derive(Clone)]
pub struct CountingConfigSource {
    document: Arc<RwLock<Value>>,
    fetches: Arc<AtomicU64>,
    delay: Duration,
}

impl CountingConfigSource {
    pub fn new(document: Value) -> Self {
        Self {
            document: Arc::new(RwLock::new(document)),
            fetches: Arc::new(AtomicU64::new(0)),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn set_document(&self, document: Value) {
        *self.document.write().await = document;
    }

    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExternalConfigSource for CountingConfigSource {
    async fn fetch(&self) -> Result<Value, DomainError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.document.read().await.clone())
    }

    fn describe(&self) -> String {
        "counting://config".to_string()
    }
}
