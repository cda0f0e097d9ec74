//! Wallet lifecycle tests - full facade round trips against the embedded
//! engine, with the data root redirected into a tempdir per test.

use beevault::{wallet, ErrorKind, ExportConfig, ImportConfig, WalletConfig, WalletCredential};
use once_cell::sync::Lazy;
use std::sync::Mutex;
use tempfile::TempDir;

// Tests mutate BEEVAULT_HOME; serialize them.
static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn temp_home() -> (TempDir, std::sync::MutexGuard<'static, ()>) {
    let guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
    let dir = TempDir::new().expect("tempdir");
    std::env::set_var("BEEVAULT_HOME", dir.path());
    (dir, guard)
}

#[test]
fn test_create_then_delete_succeeds() {
    let (_dir, _guard) = temp_home();
    let config = WalletConfig::new("lifecycle");
    let credential = WalletCredential::new("k");

    wallet::create_wallet(&config, &credential).unwrap();
    wallet::delete_wallet(&config, &credential).unwrap();

    // Gone: a second delete reports not-found.
    let err = wallet::delete_wallet(&config, &credential).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WalletNotFound);
}

#[test]
fn test_create_empty_id_is_invalid_param() {
    let (_dir, _guard) = temp_home();
    let err = wallet::create_wallet(&WalletConfig::new(""), &WalletCredential::new("k"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParam);
}

#[test]
fn test_duplicate_create_reports_already_exists() {
    let (_dir, _guard) = temp_home();
    let config = WalletConfig::new("dup");
    let credential = WalletCredential::new("k");

    wallet::create_wallet(&config, &credential).unwrap();
    let err = wallet::create_wallet(&config, &credential).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WalletAlreadyExists);
}

#[test]
fn test_open_missing_wallet_reports_not_found() {
    let (_dir, _guard) = temp_home();
    let err = wallet::open_wallet(&WalletConfig::new("ghost"), &WalletCredential::new("k"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WalletNotFound);
}

#[test]
fn test_double_open_reports_already_opened() {
    let (_dir, _guard) = temp_home();
    let config = WalletConfig::new("twice");
    let credential = WalletCredential::new("k");

    wallet::create_wallet(&config, &credential).unwrap();
    let handle = wallet::open_wallet(&config, &credential).unwrap();
    let err = wallet::open_wallet(&config, &credential).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WalletAlreadyOpened);
    wallet::close_wallet(handle).unwrap();

    // Open works again after close.
    let handle = wallet::open_wallet(&config, &credential).unwrap();
    wallet::close_wallet(handle).unwrap();
}

#[test]
fn test_open_with_wrong_key_is_access_denied() {
    let (_dir, _guard) = temp_home();
    let config = WalletConfig::new("locked");

    wallet::create_wallet(&config, &WalletCredential::new("right")).unwrap();
    let err = wallet::open_wallet(&config, &WalletCredential::new("wrong")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);
}

#[test]
fn test_export_to_existing_path_fails_fresh_path_yields_artifact() {
    let (dir, _guard) = temp_home();
    let config = WalletConfig::new("exporter");
    let credential = WalletCredential::new("k");

    wallet::create_wallet(&config, &credential).unwrap();
    let handle = wallet::open_wallet(&config, &credential).unwrap();

    let taken = dir.path().join("taken");
    std::fs::create_dir_all(&taken).unwrap();
    let err = wallet::export_wallet(handle, &ExportConfig::new("xk").with_path(&taken))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExportPathExists);

    let fresh = dir.path().join("backup");
    wallet::export_wallet(handle, &ExportConfig::new("xk").with_path(&fresh)).unwrap();
    wallet::close_wallet(handle).unwrap();

    // The artifact is a readable JSON document naming the wallet.
    let raw = std::fs::read_to_string(&fresh).unwrap();
    let artifact: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(artifact["format"], "beevault-export@v1");
    assert_eq!(artifact["id"], "exporter");
}

#[test]
fn test_racing_exports_to_one_path_write_exactly_once() {
    let (dir, _guard) = temp_home();
    let config = WalletConfig::new("export-race");
    let credential = WalletCredential::new("k");

    wallet::create_wallet(&config, &credential).unwrap();
    let handle = wallet::open_wallet(&config, &credential).unwrap();

    // Submit everything before waiting so the writes genuinely race on the
    // engine's worker threads. Exactly one may claim the path.
    let contested = dir.path().join("contested.export");
    let replies: Vec<_> = (0..8)
        .map(|_| wallet::ops::export_wallet(handle, &ExportConfig::new("xk").with_path(&contested)))
        .collect();
    let outcomes: Vec<_> = replies.into_iter().map(|r| r.wait()).collect();

    assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1);
    for lost in outcomes.iter().filter_map(|o| o.as_ref().err()) {
        assert_eq!(lost.kind(), ErrorKind::ExportPathExists);
    }

    let raw = std::fs::read_to_string(&contested).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&raw).is_ok());
    wallet::close_wallet(handle).unwrap();
}

#[test]
fn test_export_import_open_round_trip() {
    let (dir, _guard) = temp_home();
    let original = WalletConfig::new("roundtrip-src");
    let original_key = WalletCredential::new("k1");

    wallet::create_wallet(&original, &original_key).unwrap();
    let handle = wallet::open_wallet(&original, &original_key).unwrap();
    let artifact = dir.path().join("roundtrip.export");
    wallet::export_wallet(handle, &ExportConfig::new("transit").with_path(&artifact)).unwrap();
    wallet::close_wallet(handle).unwrap();

    // Import under a new identity and a new key; unlock with the new key.
    let restored = WalletConfig::new("roundtrip-dst");
    let restored_key = WalletCredential::new("k2");
    wallet::import_wallet(
        &restored,
        &restored_key,
        &ImportConfig::new("transit").with_path(&artifact),
    )
    .unwrap();

    let handle = wallet::open_wallet(&restored, &restored_key).unwrap();
    wallet::close_wallet(handle).unwrap();
}

#[test]
fn test_import_with_wrong_export_key_is_access_denied() {
    let (dir, _guard) = temp_home();
    let config = WalletConfig::new("import-key-src");
    let credential = WalletCredential::new("k");

    wallet::create_wallet(&config, &credential).unwrap();
    let handle = wallet::open_wallet(&config, &credential).unwrap();
    let artifact = dir.path().join("guarded.export");
    wallet::export_wallet(handle, &ExportConfig::new("right").with_path(&artifact)).unwrap();
    wallet::close_wallet(handle).unwrap();

    let err = wallet::import_wallet(
        &WalletConfig::new("import-key-dst"),
        &WalletCredential::new("k"),
        &ImportConfig::new("wrong").with_path(&artifact),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);
}

#[test]
fn test_import_from_missing_path_reports_path_not_found() {
    let (dir, _guard) = temp_home();
    let err = wallet::import_wallet(
        &WalletConfig::new("import-miss"),
        &WalletCredential::new("k"),
        &ImportConfig::new("xk").with_path(dir.path().join("nothing.export")),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ImportPathNotFound);
}

#[test]
fn test_rekey_rotates_the_unlock_key() {
    let (_dir, _guard) = temp_home();
    let config = WalletConfig::new("rekeyed");

    wallet::create_wallet(&config, &WalletCredential::new("old")).unwrap();

    let handle = wallet::open_wallet(&config, &WalletCredential::new("old").with_rekey("new"))
        .unwrap();
    wallet::close_wallet(handle).unwrap();

    // Old key no longer unlocks; the new one does.
    let err = wallet::open_wallet(&config, &WalletCredential::new("old")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);
    let handle = wallet::open_wallet(&config, &WalletCredential::new("new")).unwrap();
    wallet::close_wallet(handle).unwrap();
}

#[test]
fn test_concurrent_lifecycles_resolve_every_handle() {
    let (_dir, _guard) = temp_home();
    const N: usize = 16;

    let workers: Vec<_> = (0..N)
        .map(|i| {
            std::thread::spawn(move || {
                let config = WalletConfig::new(format!("concurrent-{i}"));
                let credential = WalletCredential::new("k");
                wallet::create_wallet(&config, &credential)?;
                let handle = wallet::open_wallet(&config, &credential)?;
                wallet::close_wallet(handle)?;
                wallet::delete_wallet(&config, &credential)
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("worker panicked").unwrap();
    }
}

#[test]
fn test_concurrent_submissions_via_ops_all_resolve() {
    let (_dir, _guard) = temp_home();
    const N: usize = 32;

    // Submit everything before waiting on anything: replies must all land
    // even though the callbacks race on the engine's worker threads.
    let replies: Vec<_> = (0..N)
        .map(|i| {
            let config = WalletConfig::new(format!("burst-{i}"));
            wallet::ops::create_wallet(&config, &WalletCredential::new("k"))
        })
        .collect();

    for reply in replies {
        assert_eq!(reply.wait(), Ok(None));
    }
}
