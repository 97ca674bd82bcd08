use std::sync::Arc;

use chrono::{FixedOffset, TimeZone};
use escalator_core::{
    config::StorageBackend, AppConfig, CallAttemptRecord, CallLogSheet, Candidate, Clock,
    ObjectStore, ResponseStatus, RunPointer,
};
use escalator_infrastructure::{CallLogStore, FsObjectStore, InfrastructureFactory, StateStore};

fn config_rooted_at(root: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::Filesystem;
    config.storage.root = root.to_string_lossy().to_string();
    config
}

#[tokio::test]
async fn test_dispatch_artifacts_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_rooted_at(dir.path());
    let store = InfrastructureFactory::object_store(&config).unwrap();

    let call_logs = CallLogStore::from_config(store.clone(), &config);
    let state = StateStore::from_config(store.clone(), &config);

    let at = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2026, 10, 18, 0, 0, 1)
        .unwrap();
    let record = CallAttemptRecord::succeeded(
        &Candidate::new("鈴木", "+819022222222", None),
        at,
        "c-1",
    );
    let mut sheet = CallLogSheet::new();
    sheet.append(&record);

    let key = call_logs.new_log_key(at);
    call_logs.save(&key, &sheet).await.unwrap();
    state.save_latest(&RunPointer::new(key.clone(), 0)).await.unwrap();
    state.save_indexed("c-1", &RunPointer::new(key.clone(), 0)).await.unwrap();

    assert!(dir
        .path()
        .join("connect-call-log/result_log_20261018_000001.json")
        .is_file());
    assert!(dir.path().join("connect-call-log/latest_log_key.json").is_file());
    assert!(dir.path().join("connect-call-log/runs/Yy0x.json").is_file());

    // 另一个进程用同一目录读回
    let reopened: Arc<dyn ObjectStore> = Arc::new(FsObjectStore::new(dir.path()));
    let pointer = StateStore::from_config(reopened.clone(), &config)
        .load_latest()
        .await
        .unwrap();
    assert_eq!(pointer.log_key, key);

    let mut loaded = CallLogStore::from_config(reopened, &config)
        .load(&pointer.log_key)
        .await
        .unwrap();
    let row = loaded.find_by_correlation_id("c-1").unwrap().unwrap();
    loaded.set_response_status(row, ResponseStatus::NoAnswer).unwrap();
    assert_eq!(loaded.record(row).unwrap().response_status, ResponseStatus::NoAnswer);
}

#[tokio::test]
async fn test_memory_backend_starts_empty() {
    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::Memory;
    let store = InfrastructureFactory::object_store(&config).unwrap();
    assert!(store.get(&config.roster.key).await.unwrap().is_none());
}

#[tokio::test]
async fn test_filesystem_backend_writes_under_configured_root() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_rooted_at(dir.path());
    let store = InfrastructureFactory::object_store(&config).unwrap();
    store.put("a/b.json", b"{}".to_vec(), "application/json").await.unwrap();
    assert!(dir.path().join("a").join("b.json").exists());
}

#[test]
fn test_clock_follows_configured_offset() {
    let mut config = AppConfig::default();
    config.dispatcher.utc_offset_hours = 9;
    let clock = InfrastructureFactory::clock(&config).unwrap();
    assert_eq!(clock.now().offset().local_minus_utc(), 9 * 3600);

    config.dispatcher.utc_offset_hours = 48;
    assert!(InfrastructureFactory::clock(&config).is_err());
}
