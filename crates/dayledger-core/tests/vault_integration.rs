//! Vault tier-selection and contract tests.
//!
//! The save/read/list/delete/rename contract must behave identically
//! regardless of which tier the init protocol selected.

use dayledger_core::record::{CompletedTask, RecordStore};
use dayledger_core::vault::{StorageTier, Vault, VaultOptions};
use tempfile::TempDir;

fn options(dir: &TempDir) -> VaultOptions {
    VaultOptions::new(dir.path())
}

async fn open_kv(dir: &TempDir) -> Vault {
    let mut opts = options(dir);
    opts.trusted = false;
    Vault::open(opts).await.unwrap()
}

#[tokio::test]
async fn durable_tier_selected_on_trusted_context() {
    let dir = TempDir::new().unwrap();
    let vault = Vault::open(options(&dir)).await.unwrap();
    assert_eq!(vault.tier(), StorageTier::Durable);
}

#[tokio::test]
async fn untrusted_context_forces_key_value_tier() {
    let dir = TempDir::new().unwrap();
    let vault = open_kv(&dir).await;
    assert_eq!(vault.tier(), StorageTier::KeyValue);
}

#[tokio::test]
async fn falls_back_to_key_value_when_durable_unavailable() {
    let dir = TempDir::new().unwrap();
    // A plain file where the vault subdirectory should go makes the
    // durable acquisition fail.
    std::fs::write(dir.path().join("vault"), b"not a directory").unwrap();
    let vault = Vault::open(options(&dir)).await.unwrap();
    assert_eq!(vault.tier(), StorageTier::KeyValue);

    // The external contract is unchanged.
    let outcome = vault.save_text("note.txt", "hello", "text/plain").await;
    assert!(outcome.ok);
    assert_eq!(vault.read("note.txt").await.as_deref(), Some("hello"));
}

#[tokio::test]
async fn round_trip_on_both_selectable_tiers() {
    for untrusted in [false, true] {
        let dir = TempDir::new().unwrap();
        let mut opts = options(&dir);
        opts.trusted = !untrusted;
        let vault = Vault::open(opts).await.unwrap();

        let outcome = vault
            .save_json("backup.json", &serde_json::json!({"a": 1, "b": [1, 2]}))
            .await;
        assert!(outcome.ok);
        assert_eq!(outcome.storage, vault.tier());

        let text = vault.read("backup.json").await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["a"], 1);

        assert!(vault.read("absent.json").await.is_none());
        assert!(vault.delete("backup.json").await);
        assert!(!vault.delete("backup.json").await);
    }
}

#[tokio::test]
async fn list_is_sorted_by_last_modified_descending() {
    let dir = TempDir::new().unwrap();
    let vault = open_kv(&dir).await;
    vault.save_text("first.txt", "1", "text/plain").await;
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    vault.save_text("second.txt", "2", "text/plain").await;

    let entries = vault.list().await;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "second.txt");
    assert_eq!(entries[1].name, "first.txt");
    assert!(entries[0].last_modified >= entries[1].last_modified);
    assert_eq!(entries[0].size, 1);
}

#[tokio::test]
async fn rename_moves_content() {
    let dir = TempDir::new().unwrap();
    let vault = Vault::open(options(&dir)).await.unwrap();
    vault.save_text("old.txt", "payload", "text/plain").await;

    assert!(vault.rename("old.txt", "new.txt").await);
    assert_eq!(vault.read("new.txt").await.as_deref(), Some("payload"));
    assert!(vault.read("old.txt").await.is_none());
}

#[tokio::test]
async fn rename_to_same_name_keeps_content() {
    for untrusted in [false, true] {
        let dir = TempDir::new().unwrap();
        let mut opts = options(&dir);
        opts.trusted = !untrusted;
        let vault = Vault::open(opts).await.unwrap();
        vault.save_text("a.txt", "payload", "text/plain").await;

        assert!(!vault.rename("a.txt", "a.txt").await);
        assert_eq!(vault.read("a.txt").await.as_deref(), Some("payload"));
    }
}

#[tokio::test]
async fn rename_write_failure_leaves_old_content_intact() {
    let dir = TempDir::new().unwrap();
    let vault = Vault::open(options(&dir)).await.unwrap();
    assert_eq!(vault.tier(), StorageTier::Durable);
    vault.save_text("old.txt", "payload", "text/plain").await;

    // A directory occupying the target path makes the write-new step fail.
    std::fs::create_dir(dir.path().join("vault").join("new.txt")).unwrap();

    assert!(!vault.rename("old.txt", "new.txt").await);
    assert_eq!(vault.read("old.txt").await.as_deref(), Some("payload"));
}

#[tokio::test]
async fn rename_fails_on_missing_or_empty_source() {
    let dir = TempDir::new().unwrap();
    let vault = Vault::open(options(&dir)).await.unwrap();
    assert!(!vault.rename("missing.txt", "new.txt").await);

    vault.save_text("empty.txt", "", "text/plain").await;
    assert!(!vault.rename("empty.txt", "new.txt").await);
}

#[tokio::test]
async fn get_blob_infers_mime_from_extension() {
    let dir = TempDir::new().unwrap();
    let vault = Vault::open(options(&dir)).await.unwrap();
    vault.save_text("data.csv", "a,b\n1,2\n", "text/csv").await;

    let blob = vault.get_blob("data.csv").await.unwrap();
    assert_eq!(blob.mime_type, "text/csv");
    assert_eq!(blob.bytes, b"a,b\n1,2\n");
    assert!(vault.get_blob("absent.bin").await.is_none());
}

#[tokio::test]
async fn malformed_stored_json_reads_as_absent() {
    let dir = TempDir::new().unwrap();
    let vault = Vault::open(options(&dir)).await.unwrap();
    vault
        .save_text("record-2026-01-01.json", "{ not json", "application/json")
        .await;
    let store = RecordStore::new(&vault);
    assert!(store.load("2026-01-01").await.is_none());
    // load_or_new treats it as a fresh day.
    let rec = store.load_or_new("2026-01-01").await.unwrap();
    assert!(rec.study_sessions.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn write_failure_hands_content_off_as_download() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let vault = Vault::open(options(&dir)).await.unwrap();
    assert_eq!(vault.tier(), StorageTier::Durable);

    let vault_dir = dir.path().join("vault");
    let writable = std::fs::metadata(&vault_dir).unwrap().permissions();
    std::fs::set_permissions(&vault_dir, std::fs::Permissions::from_mode(0o555)).unwrap();

    let outcome = vault.save_text("note.txt", "keep me", "text/plain").await;
    assert!(!outcome.ok);
    assert_eq!(outcome.storage, StorageTier::Download);
    let handed_off = std::fs::read_to_string(vault.export_dir().join("note.txt")).unwrap();
    assert_eq!(handed_off, "keep me");

    std::fs::set_permissions(&vault_dir, writable).unwrap();
}

#[tokio::test]
async fn record_store_roundtrip_and_catalog() {
    let dir = TempDir::new().unwrap();
    let vault = Vault::open(options(&dir)).await.unwrap();
    let store = RecordStore::new(&vault);

    let mut rec = store.load_or_new("2026-03-14").await.unwrap();
    rec.record_task(CompletedTask::new(
        "socialBonds",
        "Call parents",
        2.5,
        chrono::Utc::now(),
    ))
    .unwrap();
    assert!(store.save(&rec).await.ok);

    let loaded = store.load("2026-03-14").await.unwrap();
    assert_eq!(loaded, rec);
    assert_eq!(loaded.total_earnings.social_bonds, 2.5);

    let mut rec2 = store.load_or_new("2026-03-15").await.unwrap();
    rec2.set_wakeup(chrono::Utc::now());
    store.save(&rec2).await;
    let all = store.all().await;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].date, "2026-03-14");
    assert_eq!(all[1].date, "2026-03-15");

    let mut catalog = store.load_catalog().await;
    catalog.add_custom_category("piano").unwrap();
    catalog.add_task("piano", "Practice scales").unwrap();
    assert!(store.save_catalog(&catalog).await.ok);
    let reloaded = store.load_catalog().await;
    assert!(reloaded.is_known_category("piano"));
}
