use super::*;
use chrono::TimeZone;
use tempfile::TempDir;

#[tokio::test]
async fn test_memory_credentials_save_replaces() {
    let store = MemoryCredentialStore::new();
    assert!(store.load().await.unwrap().is_none());

    store
        .save(&Credentials::new("first@example.org", "a"))
        .await
        .unwrap();
    store
        .save(&Credentials::new("second@example.org", "b"))
        .await
        .unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    assert_eq!(loaded.identifier, "second@example.org");
}

#[tokio::test]
async fn test_memory_credentials_clear() {
    let store = MemoryCredentialStore::new();
    store
        .save(&Credentials::new("user@example.org", "s"))
        .await
        .unwrap();
    store.clear().await.unwrap();
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_credentials_roundtrip() {
    let dir = TempDir::new().unwrap();
    let store = FileCredentialStore::new(dir.path());

    assert!(store.load().await.unwrap().is_none());

    let credentials = Credentials::new("user@example.org", "secret");
    store.save(&credentials).await.unwrap();
    assert_eq!(store.load().await.unwrap(), Some(credentials));

    store.clear().await.unwrap();
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_credentials_clear_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = FileCredentialStore::new(dir.path());
    store.clear().await.unwrap();
    store.clear().await.unwrap();
}

#[tokio::test]
async fn test_marker_roundtrip() {
    let dir = TempDir::new().unwrap();
    let store = FileClearMarkerStore::new(dir.path());

    assert!(store.last_clear().await.unwrap().is_none());

    let at = Local.with_ymd_and_hms(2026, 8, 31, 14, 5, 0).unwrap();
    store.record_clear(at).await.unwrap();
    assert_eq!(store.last_clear().await.unwrap(), Some(at));
}

#[tokio::test]
async fn test_memory_marker() {
    let store = MemoryClearMarkerStore::new();
    assert!(store.last_clear().await.unwrap().is_none());

    let at = Local.with_ymd_and_hms(2026, 8, 31, 8, 0, 0).unwrap();
    store.record_clear(at).await.unwrap();
    assert_eq!(store.last_clear().await.unwrap(), Some(at));
}
