use dashlet_application::services::{
    CheckOutcome, ConfigWatcher, ServiceStore, SettingsStore, WatcherState,
};
use dashlet_domain::{DomainError, SettingKey};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

mod helpers;
use helpers::{ids, service, MockConfigSource, MockServiceRepository, MockSettingsRepository};

struct Fixture {
    source: MockConfigSource,
    settings_repo: Arc<MockSettingsRepository>,
    services_repo: Arc<MockServiceRepository>,
    settings: Arc<SettingsStore>,
    services: Arc<ServiceStore>,
    watcher: Arc<ConfigWatcher>,
}

async fn fixture(document: Value) -> Fixture {
    let source = MockConfigSource::new(document);
    let settings_repo = Arc::new(MockSettingsRepository::new());
    let services_repo = Arc::new(MockServiceRepository::with_stored(vec![
        service("1", "a"),
        service("2", "b"),
    ]));
    let settings = Arc::new(SettingsStore::new(settings_repo.clone()));
    let services = Arc::new(ServiceStore::new(services_repo.clone()));
    services.load().await.unwrap();

    let watcher = Arc::new(ConfigWatcher::new(
        Arc::new(source.clone()),
        settings.clone(),
        services.clone(),
    ));
    watcher.start();

    Fixture {
        source,
        settings_repo,
        services_repo,
        settings,
        services,
        watcher,
    }
}

fn original_document() -> Value {
    json!({
        "settings": { "theme": "light" },
        "services": [{ "id": "1", "url": "a" }, { "id": "2", "url": "b" }]
    })
}

#[tokio::test]
async fn test_first_check_records_baseline_only() {
    let f = fixture(original_document()).await;

    let outcome = f.watcher.check().await;

    assert_eq!(outcome, CheckOutcome::Baseline);
    assert!(f.watcher.last_snapshot().is_some());
    assert_eq!(f.settings_repo.save_count(), 0);
    assert_eq!(f.services_repo.save_count(), 0);
    assert_eq!(f.settings.get(SettingKey::Theme).await.as_str(), Some("system"));
}

#[tokio::test]
async fn test_unchanged_content_applies_nothing() {
    let f = fixture(original_document()).await;
    f.watcher.check().await;

    let outcome = f.watcher.check().await;

    assert_eq!(outcome, CheckOutcome::Unchanged);
    assert_eq!(f.settings_repo.save_count(), 0);
    assert_eq!(f.services_repo.save_count(), 0);
}

#[tokio::test]
async fn test_key_order_change_is_not_a_change() {
    let f = fixture(json!({ "settings": { "theme": "light", "layout": "grid" } })).await;
    f.watcher.check().await;
    f.source
        .set_document(json!({ "settings": { "layout": "grid", "theme": "light" } }))
        .await;

    assert_eq!(f.watcher.check().await, CheckOutcome::Unchanged);
}

#[tokio::test]
async fn test_changed_content_applies_one_merge_and_one_reconcile() {
    let f = fixture(original_document()).await;
    f.watcher.check().await;
    f.source
        .set_document(json!({
            "settings": { "theme": "dark", "greeting": "" },
            "services": [{ "id": "2", "url": "b2" }, { "id": "3", "url": "c" }]
        }))
        .await;

    let outcome = f.watcher.check().await;

    assert_eq!(outcome, CheckOutcome::Applied);
    assert_eq!(f.settings_repo.save_count(), 1);
    assert_eq!(f.services_repo.save_count(), 1);
    assert_eq!(f.settings.get(SettingKey::Theme).await.as_str(), Some("dark"));
    assert_eq!(
        f.settings.get(SettingKey::Greeting).await.as_str(),
        Some("Lightweight dashboard for small apps")
    );
    let services = f.services.get_all().await;
    assert_eq!(ids(&services), vec!["2", "3"]);
    assert_eq!(services[0].url, "b2");
}

#[tokio::test]
async fn test_observers_notified_after_both_stores_applied() {
    let f = fixture(original_document()).await;
    f.watcher.check().await;

    let services_saves_at_notify = Arc::new(AtomicU64::new(u64::MAX));
    let seen = Arc::clone(&services_saves_at_notify);
    let services_repo = f.services_repo.clone();
    let _settings_sub = f.settings.subscribe(move |_| {
        seen.store(services_repo.save_count(), Ordering::SeqCst);
    });
    let service_notifications = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&service_notifications);
    let _services_sub = f.services.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    f.source
        .set_document(json!({
            "settings": { "theme": "dark" },
            "services": [{ "id": "1", "url": "a" }]
        }))
        .await;
    f.watcher.check().await;

    assert_eq!(services_saves_at_notify.load(Ordering::SeqCst), 1);
    assert_eq!(service_notifications.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fetch_failure_keeps_last_snapshot() {
    let f = fixture(original_document()).await;
    f.watcher.check().await;
    let baseline = f.watcher.last_snapshot();

    f.source
        .push_result(Err(DomainError::Fetch("timeout".to_string())))
        .await;
    assert_eq!(f.watcher.check().await, CheckOutcome::Failed);
    assert_eq!(f.watcher.last_snapshot(), baseline);

    assert_eq!(f.watcher.check().await, CheckOutcome::Unchanged);
}

#[tokio::test]
async fn test_failure_before_baseline_then_baseline() {
    let f = fixture(original_document()).await;
    f.source.push_result(Ok(json!(["not", "an", "object"]))).await;

    assert_eq!(f.watcher.check().await, CheckOutcome::Failed);
    assert!(f.watcher.last_snapshot().is_none());
    assert_eq!(f.watcher.check().await, CheckOutcome::Baseline);
}

#[tokio::test]
async fn test_check_while_in_flight_is_skipped() {
    let f = fixture(original_document()).await;
    let gate = f.source.install_gate().await;

    let watcher = f.watcher.clone();
    let first = tokio::spawn(async move { watcher.check().await });
    f.source.wait_entered().await;

    assert_eq!(f.watcher.state(), WatcherState::Polling);
    assert_eq!(f.watcher.check().await, CheckOutcome::Skipped);

    gate.notify_one();
    assert_eq!(first.await.unwrap(), CheckOutcome::Baseline);
    assert_eq!(f.watcher.state(), WatcherState::Idle);
    assert_eq!(f.source.fetch_count(), 1);
}

#[tokio::test]
async fn test_stop_discards_in_flight_result() {
    let f = fixture(original_document()).await;
    f.watcher.check().await;
    f.source
        .set_document(json!({ "services": [] }))
        .await;
    let gate = f.source.install_gate().await;

    let watcher = f.watcher.clone();
    let pending = tokio::spawn(async move { watcher.check().await });
    f.source.wait_entered().await;
    f.watcher.stop();
    gate.notify_one();

    assert_eq!(pending.await.unwrap(), CheckOutcome::Discarded);
    assert!(!f.watcher.is_active());
    assert_eq!(ids(&f.services.get_all().await), vec!["1", "2"]);
    assert_eq!(f.services_repo.save_count(), 0);
}

#[tokio::test]
async fn test_failed_apply_does_not_advance_snapshot() {
    let f = fixture(original_document()).await;
    f.watcher.check().await;
    let baseline = f.watcher.last_snapshot();
    f.source
        .set_document(json!({ "services": [{ "id": "9", "url": "z" }] }))
        .await;
    f.services_repo.set_should_fail(true);

    assert_eq!(f.watcher.check().await, CheckOutcome::Failed);
    assert_eq!(f.watcher.last_snapshot(), baseline);

    f.services_repo.set_should_fail(false);
    assert_eq!(f.watcher.check().await, CheckOutcome::Applied);
    assert_eq!(ids(&f.services.get_all().await), vec!["9"]);
}

fn counting_subscribers(f: &Fixture) -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let settings_calls = Arc::new(AtomicUsize::new(0));
    let services_calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&settings_calls);
    let _settings_sub = f.settings.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let counter = Arc::clone(&services_calls);
    let _services_sub = f.services.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    (settings_calls, services_calls)
}

#[tokio::test]
async fn test_failed_service_stage_still_announces_committed_settings() {
    let f = fixture(original_document()).await;
    f.watcher.check().await;
    let (settings_calls, services_calls) = counting_subscribers(&f);

    f.source
        .set_document(json!({
            "settings": { "theme": "dark" },
            "services": [{ "id": "9", "url": "z" }]
        }))
        .await;
    f.services_repo.set_should_fail(true);

    assert_eq!(f.watcher.check().await, CheckOutcome::Failed);
    assert_eq!(f.settings.get(SettingKey::Theme).await.as_str(), Some("dark"));
    assert_eq!(f.settings_repo.save_count(), 1);
    assert_eq!(settings_calls.load(Ordering::SeqCst), 1);
    assert_eq!(services_calls.load(Ordering::SeqCst), 0);
    assert_eq!(ids(&f.services.get_all().await), vec!["1", "2"]);
}

#[tokio::test]
async fn test_dropped_check_announces_committed_settings() {
    let f = fixture(original_document()).await;
    f.watcher.check().await;
    let (settings_calls, services_calls) = counting_subscribers(&f);

    f.source
        .set_document(json!({
            "settings": { "theme": "dark" },
            "services": [{ "id": "9", "url": "z" }]
        }))
        .await;
    let _gate = f.services_repo.hold_saves().await;

    let watcher = f.watcher.clone();
    let pending = tokio::spawn(async move { watcher.check().await });
    f.services_repo.wait_save_entered().await;
    pending.abort();
    assert!(pending.await.unwrap_err().is_cancelled());

    assert_eq!(f.settings.get(SettingKey::Theme).await.as_str(), Some("dark"));
    assert_eq!(settings_calls.load(Ordering::SeqCst), 1);
    assert_eq!(services_calls.load(Ordering::SeqCst), 0);
    assert_eq!(f.watcher.state(), WatcherState::Idle);
}
