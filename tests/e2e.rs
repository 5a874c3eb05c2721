//! End-to-end tests for the shopper CLI
//!
//! These tests run the actual CLI binary against a store in a temp dir and
//! check what ends up on disk.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;
use tempfile::TempDir;

const SWORD_STORE: &str = r#"
sword: {blade: 1, handle: 1}
blade: {iron: 2}
handle: {wood: 1}
iron: ~
wood: ~
"#;

/// Get the path to the shopper binary
fn shopper_bin() -> PathBuf {
    // During tests, the binary is in target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove deps
    path.push("shopper");
    path
}

/// Create a test environment holding a store with the given content
fn create_test_env(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("materials.json");
    std::fs::write(&store, content).unwrap();
    (dir, store)
}

/// Run shopper against `store` without prompting
fn run_shopper(args: &[&str], store: &Path) -> std::process::Output {
    let config = store.with_file_name("no-config.toml");
    Command::new(shopper_bin())
        .args(["--data", store.to_str().unwrap(), "--no-prompt"])
        .args(args)
        .env_remove("SHOPPER_DATA")
        .env("SHOPPER_CONFIG", config)
        .output()
        .expect("Failed to execute shopper command")
}

/// Store contents and modification time
fn snapshot(store: &Path) -> (Vec<u8>, SystemTime) {
    let bytes = std::fs::read(store).unwrap();
    let modified = std::fs::metadata(store).unwrap().modified().unwrap();
    (bytes, modified)
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// The store was rewritten as pretty JSON holding the same recipes
fn assert_resaved(store: &Path) {
    let content = std::fs::read_to_string(store).unwrap();
    assert!(content.starts_with("{\n    \""), "not rewritten: {}", content);
    let graph = recipe_shopper::store::parse(&content).unwrap();
    assert!(graph.contains("sword"));
}

// =============================================================================
// CLI Help and Version Tests
// =============================================================================

#[test]
fn test_cli_help() {
    let output = Command::new(shopper_bin())
        .arg("--help")
        .output()
        .expect("Failed to run shopper --help");

    assert!(output.status.success());
    let text = stdout(&output);
    for command in ["make", "add", "rename", "del", "info"] {
        assert!(text.contains(command), "help lacks {}", command);
    }
}

// =============================================================================
// Successful commands re-save the store
// =============================================================================

#[test]
fn test_make_prints_plan_and_resaves() {
    let (_dir, store) = create_test_env(SWORD_STORE);

    let output = run_shopper(&["make", "2", "sword"], &store);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Get:"));
    assert!(text.contains("\t  4 iron(s)"));
    assert!(text.contains("\t  2: 2 sword(s)"));
    assert_resaved(&store);
}

#[test]
fn test_info_resaves() {
    let (_dir, store) = create_test_env(SWORD_STORE);

    let output = run_shopper(&["info", "Blade"], &store);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("crafting distance: 1"));
    assert_resaved(&store);
}

#[test]
fn test_add_existing_warns_and_resaves() {
    let (_dir, store) = create_test_env(SWORD_STORE);

    let output = run_shopper(&["add", "sword"], &store);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("already exists"));
    assert_resaved(&store);
}

#[test]
fn test_rename_persists() {
    let (_dir, store) = create_test_env(SWORD_STORE);

    let output = run_shopper(&["rename", "iron", "ore"], &store);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let graph = recipe_shopper::store::load(&store).unwrap();
    assert!(graph.contains("ore"));
    assert!(!graph.contains("iron"));
}

#[test]
fn test_failed_add_on_missing_store_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("fresh.json");

    let output = run_shopper(&["add", "sword"], &store);

    // --no-prompt leaves nothing to define sword with
    assert!(!output.status.success());
    assert!(!store.exists());
}

// =============================================================================
// Failed commands exit non-zero and leave the store alone
// =============================================================================

#[test]
fn test_del_fails_without_writing() {
    let (_dir, store) = create_test_env(SWORD_STORE);
    let before = snapshot(&store);

    let output = run_shopper(&["del", "sword"], &store);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("sword"));
    assert_eq!(snapshot(&store), before);
}

#[test]
fn test_failed_rename_does_not_write() {
    let (_dir, store) = create_test_env(SWORD_STORE);
    let before = snapshot(&store);

    let output = run_shopper(&["rename", "iron", "wood"], &store);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("wood"));
    assert_eq!(snapshot(&store), before);
}

#[test]
fn test_make_unknown_item_does_not_write() {
    let (_dir, store) = create_test_env(SWORD_STORE);
    let before = snapshot(&store);

    let output = run_shopper(&["make", "sword", "shield"], &store);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("shield"));
    assert_eq!(snapshot(&store), before);
}

#[test]
fn test_make_bad_count_does_not_write() {
    let (_dir, store) = create_test_env(SWORD_STORE);
    let before = snapshot(&store);

    let output = run_shopper(&["make", "0", "sword"], &store);

    assert!(!output.status.success());
    assert_eq!(snapshot(&store), before);
}

#[test]
fn test_cyclic_store_fails_to_load() {
    let (_dir, store) = create_test_env("cog: {gear: 1}\ngear: {cog: 1}\n");
    let before = snapshot(&store);

    let output = run_shopper(&["info", "cog"], &store);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("cycle"));
    assert_eq!(snapshot(&store), before);
}
