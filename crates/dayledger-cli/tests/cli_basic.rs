//! Basic CLI E2E tests.
//!
//! These invoke the binary via cargo run and stay on read-only surfaces
//! (help/version) so they never touch the user's data directory.

use std::process::Command;

/// Run a CLI command and return output.
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "dayledger-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_top_level_help() {
    let (stdout, _stderr, code) = run_cli(&["--help"]);
    assert_eq!(code, 0);
    for subcommand in ["checkin", "task", "study", "stats", "export", "config", "vault"] {
        assert!(
            stdout.contains(subcommand),
            "help missing subcommand '{subcommand}': {stdout}"
        );
    }
}

#[test]
fn test_version_flag() {
    let (stdout, _stderr, code) = run_cli(&["--version"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("dayledger"));
}

#[test]
fn test_study_help_lists_timer_actions() {
    let (stdout, _stderr, code) = run_cli(&["study", "--help"]);
    assert_eq!(code, 0);
    for action in ["start", "pause", "resume", "stop", "status", "mode"] {
        assert!(stdout.contains(action), "study help missing '{action}'");
    }
}

#[test]
fn test_unknown_subcommand_fails() {
    let (_stdout, stderr, code) = run_cli(&["frobnicate"]);
    assert_ne!(code, 0);
    assert!(!stderr.is_empty());
}
