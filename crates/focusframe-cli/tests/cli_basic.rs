//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against an isolated home
//! directory and verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command with `home` as the data directory root.
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-p", "focusframe-cli", "--quiet", "--"])
        .args(args)
        .env("HOME", home)
        .env("FOCUSFRAME_ENV", "production")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn artwork_list_shows_seeded_catalog() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["artwork", "list", "--json"]);
    assert_eq!(code, 0);

    let artworks: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(artworks.as_array().unwrap().len(), 6);
}

#[test]
fn challenge_round_trip() {
    let home = tempfile::tempdir().unwrap();

    let (code, _, _) = run_cli(home.path(), &["challenge", "status"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(
        home.path(),
        &[
            "challenge",
            "start",
            "--artwork",
            "hokusai-great-wave",
            "--grid",
            "5",
        ],
    );
    assert_eq!(code, 0, "challenge start failed");
    let challenge: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(challenge["total_cells"], 25);
    assert_eq!(challenge["status"], "active");

    // A second start is refused while one is active.
    let (code, _, stderr) = run_cli(
        home.path(),
        &["challenge", "start", "--artwork", "korin-irises"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("already active"));

    let (code, stdout, _) = run_cli(home.path(), &["challenge", "abandon"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("abandoned"));

    let (code, stdout, _) = run_cli(home.path(), &["challenge", "status"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("no active challenge"));
}

#[test]
fn settings_get_and_set() {
    let home = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli(home.path(), &["settings", "get", "default_grid_size"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "8");

    let (code, _, _) = run_cli(home.path(), &["settings", "set", "default_grid_size", "10"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(home.path(), &["settings", "get", "default_grid_size"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "10");

    let (code, _, _) = run_cli(home.path(), &["settings", "set", "no_such_key", "1"]);
    assert_ne!(code, 0);
}

#[test]
fn stats_start_at_zero() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["stats"]);
    assert_eq!(code, 0);

    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["total_sessions"], 0);
    assert_eq!(stats["completed_challenges"], 0);
}
