use recentfeat::{error::AuthError, management::TokenStore, types::TokenRecord};
use tempfile::tempdir;

fn create_test_record(expires_at: i64) -> TokenRecord {
    TokenRecord {
        access_token: "access-1".to_string(),
        refresh_token: "refresh-1".to_string(),
        expires_at,
    }
}

#[tokio::test]
async fn test_load_missing_file_is_none() {
    let dir = tempdir().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));

    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_save_then_load_keeps_expiry_unchanged() {
    let dir = tempdir().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));
    let record = create_test_record(1_700_003_540);

    store.save(&record).await.unwrap();
    let loaded = store.load().await.unwrap().unwrap();

    // The margin was applied when the record was issued, persisting must not shift it again.
    assert_eq!(loaded, record);
    assert_eq!(loaded.expires_at, 1_700_003_540);

    // Saving a loaded record again is stable too
    store.save(&loaded).await.unwrap();
    assert_eq!(store.load().await.unwrap().unwrap().expires_at, 1_700_003_540);
}

#[tokio::test]
async fn test_save_writes_expected_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("token.json");
    let store = TokenStore::new(&path);

    store.save(&create_test_record(42)).await.unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "expires_at": 42
        })
    );
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("cache").join("token.json");
    let store = TokenStore::new(&path);

    store.save(&create_test_record(1)).await.unwrap();

    assert!(path.is_file());
}

#[tokio::test]
async fn test_save_overwrites_and_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));

    store.save(&create_test_record(1)).await.unwrap();
    let mut second = create_test_record(2);
    second.access_token = "access-2".to_string();
    store.save(&second).await.unwrap();

    assert_eq!(store.load().await.unwrap().unwrap(), second);

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("token.json")]);
}

#[tokio::test]
async fn test_load_corrupt_file_is_decode_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("token.json");
    std::fs::write(&path, "{ not json").unwrap();
    let store = TokenStore::new(&path);

    let err = store.load().await.unwrap_err();

    assert!(err.is_decode());
    match err {
        AuthError::Decode { path: p, .. } => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_load_wrong_shape_is_decode_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("token.json");
    std::fs::write(&path, r#"{"access_token":"A"}"#).unwrap();

    let err = TokenStore::new(&path).load().await.unwrap_err();

    assert!(err.is_decode());
}

#[tokio::test]
async fn test_clear() {
    let dir = tempdir().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));
    store.save(&create_test_record(1)).await.unwrap();

    assert!(store.clear().await.unwrap());
    assert!(!store.clear().await.unwrap());
    assert_eq!(store.load().await.unwrap(), None);
}

#[cfg(unix)]
#[tokio::test]
async fn test_saved_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let path = dir.path().join("token.json");
    TokenStore::new(&path)
        .save(&create_test_record(1))
        .await
        .unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[cfg(unix)]
#[tokio::test]
async fn test_save_replaces_stale_world_readable_temp_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let path = dir.path().join("token.json");
    let tmp = dir.path().join("token.json.tmp");

    // Leftover from an interrupted run
    std::fs::write(&tmp, "stale").unwrap();
    std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o644)).unwrap();

    let store = TokenStore::new(&path);
    store.save(&create_test_record(1)).await.unwrap();

    assert!(!tmp.exists());
    assert_eq!(store.load().await.unwrap().unwrap(), create_test_record(1));
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[tokio::test]
async fn test_failed_save_removes_temp_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("token.json");

    // A non-empty directory in the way makes the rename fail
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("keep"), "x").unwrap();

    let err = TokenStore::new(&path)
        .save(&create_test_record(1))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Io(_)));
    assert!(!dir.path().join("token.json.tmp").exists());
    assert!(path.join("keep").is_file());
}
