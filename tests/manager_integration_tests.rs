//! Integration tests for FileManager and the named-file lifecycle
//!
//! These tests verify:
//! - Legacy directory migration and the conflict path
//! - Bootstrap of well-known files from bundled defaults
//! - Setup idempotence
//! - Save/reload round trips and unsaved-edit semantics
//! - Failure isolation in batch reloads

use camino::Utf8PathBuf;
use std::fs;
use tempfile::TempDir;
use voucherfiles::{DefaultsBundle, FileManager, NamedFileId};

fn create_roots() -> (TempDir, Utf8PathBuf, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let base = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    let data_root = base.join("ProVouchers");
    let legacy_root = base.join("Vouchers");
    (temp_dir, data_root, legacy_root)
}

fn create_manager() -> (TempDir, FileManager) {
    let (temp_dir, data_root, legacy_root) = create_roots();
    let manager = FileManager::new(data_root, legacy_root, DefaultsBundle::builtin());
    (temp_dir, manager)
}

#[test]
fn test_setup_bootstraps_well_known_files() {
    let (_temp_dir, mut manager) = create_manager();
    manager.setup().unwrap();

    for id in NamedFileId::ALL {
        assert!(
            manager.data_root().join(id.file_name()).exists(),
            "{} was not bootstrapped",
            id.file_name()
        );
        assert!(manager.named(id).is_some());
    }

    // The bundled config carries the default settings section.
    let config = manager.named(NamedFileId::Config).unwrap();
    assert!(config.get("Settings.Prefix").is_some());
}

#[test]
fn test_setup_is_idempotent() {
    let (_temp_dir, mut manager) = create_manager();

    manager.setup().unwrap();
    let first: Vec<_> = NamedFileId::ALL
        .iter()
        .map(|&id| manager.named(id).cloned())
        .collect();

    manager.setup().unwrap();
    let second: Vec<_> = NamedFileId::ALL
        .iter()
        .map(|&id| manager.named(id).cloned())
        .collect();

    assert_eq!(first, second);
}

#[test]
fn test_bootstrap_preserves_existing_content() {
    let (_temp_dir, data_root, legacy_root) = create_roots();

    fs::create_dir_all(&data_root).unwrap();
    fs::write(data_root.join("config.yml"), "Settings:\n  Prefix: 'custom'\n").unwrap();

    let mut manager = FileManager::new(data_root, legacy_root, DefaultsBundle::builtin());
    manager.setup().unwrap();

    let config = manager.named(NamedFileId::Config).unwrap();
    assert_eq!(
        config.get("Settings.Prefix").and_then(|v| v.as_str()),
        Some("custom")
    );
}

#[test]
fn test_save_reload_round_trip() {
    let (_temp_dir, mut manager) = create_manager();
    manager.setup().unwrap();

    let data = manager.named_mut(NamedFileId::Data).unwrap();
    data.set("Players.abc123.Redeemed", 7);
    let before_save = data.clone();

    manager.save_named(NamedFileId::Data).unwrap();
    manager.reload_named(NamedFileId::Data);

    assert_eq!(manager.named(NamedFileId::Data), Some(&before_save));
}

#[test]
fn test_reload_discards_unsaved_edits() {
    let (_temp_dir, mut manager) = create_manager();
    manager.setup().unwrap();

    let data = manager.named_mut(NamedFileId::Data).unwrap();
    data.set("Players.abc123.Redeemed", 7);

    manager.reload_named(NamedFileId::Data);

    let data = manager.named(NamedFileId::Data).unwrap();
    assert!(data.get("Players.abc123.Redeemed").is_none());
}

#[test]
fn test_legacy_directory_is_migrated() {
    let (_temp_dir, data_root, legacy_root) = create_roots();

    fs::create_dir_all(&legacy_root).unwrap();
    fs::write(legacy_root.join("config.yml"), "Settings:\n  Prefix: 'old'\n").unwrap();

    let mut manager = FileManager::new(
        data_root.clone(),
        legacy_root.clone(),
        DefaultsBundle::builtin(),
    );
    manager.setup().unwrap();

    assert!(data_root.exists());
    assert!(!legacy_root.exists());

    // Migrated content survives bootstrap untouched.
    let config = manager.named(NamedFileId::Config).unwrap();
    assert_eq!(
        config.get("Settings.Prefix").and_then(|v| v.as_str()),
        Some("old")
    );
}

#[test]
fn test_migration_conflict_leaves_both_directories() {
    let (_temp_dir, data_root, legacy_root) = create_roots();

    fs::create_dir_all(&data_root).unwrap();
    fs::write(data_root.join("marker.txt"), "current").unwrap();
    fs::create_dir_all(&legacy_root).unwrap();
    fs::write(legacy_root.join("marker.txt"), "legacy").unwrap();

    let mut manager = FileManager::new(
        data_root.clone(),
        legacy_root.clone(),
        DefaultsBundle::builtin(),
    );
    manager.setup().unwrap();

    assert_eq!(fs::read_to_string(data_root.join("marker.txt")).unwrap(), "current");
    assert_eq!(fs::read_to_string(legacy_root.join("marker.txt")).unwrap(), "legacy");
}

#[test]
fn test_reload_all_isolates_failures() {
    let (_temp_dir, mut manager) = create_manager();
    manager.setup().unwrap();

    let data_before = manager.named(NamedFileId::Data).cloned().unwrap();

    // Corrupt one file on disk, change another.
    fs::write(manager.data_root().join("data.yml"), "Players: [unclosed").unwrap();
    fs::write(
        manager.data_root().join("messages.yml"),
        "Messages:\n  Reload: 'done'\n",
    )
    .unwrap();

    manager.reload_all();

    // The corrupt file keeps its pre-reload document; the good one reloads.
    assert_eq!(manager.named(NamedFileId::Data), Some(&data_before));
    let messages = manager.named(NamedFileId::Messages).unwrap();
    assert_eq!(
        messages.get("Messages.Reload").and_then(|v| v.as_str()),
        Some("done")
    );
}

#[test]
fn test_skipped_identifier_has_no_document() {
    let (_temp_dir, data_root, legacy_root) = create_roots();

    // A bundle missing codes.yml skips that identifier for the pass.
    let mut defaults = DefaultsBundle::builtin();
    let mut partial = DefaultsBundle::new();
    for path in ["config.yml", "data.yml", "messages.yml"] {
        partial.insert(path, defaults.get(path).unwrap().to_vec());
    }
    defaults = partial;

    let mut manager = FileManager::new(data_root, legacy_root, defaults);
    manager.setup().unwrap();

    assert!(manager.named(NamedFileId::VoucherCodes).is_none());
    assert!(manager.save_named(NamedFileId::VoucherCodes).is_err());
}

#[test]
fn test_verbose_flag_round_trips() {
    let (_temp_dir, manager) = create_manager();
    assert!(!manager.is_verbose());

    let manager = manager.with_verbose(true);
    assert!(manager.is_verbose());
}
