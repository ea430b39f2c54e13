//! Integration tests for log destinations.
//!
//! Logs default to stderr so stdout carries only command output; `--log-output
//! file` writes under the platform state directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Matches default_log_file_path in src/logging.rs: $XDG_STATE_HOME/skillplan/skillplan.log
fn expected_log_path(state_home: &Path) -> PathBuf {
    state_home.join("skillplan").join("skillplan.log")
}

fn isolated_command(temp_dir: &TempDir) -> Command {
    let config_home = temp_dir.path().join("config");
    let home = temp_dir.path().join("home");
    let workspace = temp_dir.path().join("ws");
    fs::create_dir_all(&config_home).unwrap();
    fs::create_dir_all(&home).unwrap();
    fs::create_dir_all(&workspace).unwrap();

    let mut command = Command::new(env!("CARGO_BIN_EXE_skillplan"));
    command
        .env("XDG_STATE_HOME", temp_dir.path().join("state"))
        .env("XDG_CONFIG_HOME", config_home)
        .env("HOME", home)
        .env_remove("SKILLPLAN_LOG")
        .env_remove("SKILLPLAN_LOG_FORMAT")
        .env_remove("SKILLPLAN_LOG_OUTPUT")
        .env_remove("SKILLPLAN_LOG_MODULES")
        .env_remove("SKILLPLAN_ENV")
        .arg("--workspace")
        .arg(workspace);
    command
}

#[test]
fn test_verbose_logs_stay_off_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let output = isolated_command(&temp_dir)
        .arg("--verbose")
        .arg("categories")
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "skillplan categories should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("Programming"));
    assert!(!stdout.contains("skillplan starting"));
    assert!(stderr.contains("skillplan starting"), "verbose logs go to stderr");
}

#[test]
fn test_file_output_writes_to_state_dir() {
    let temp_dir = TempDir::new().unwrap();
    let output = isolated_command(&temp_dir)
        .args(["--log-output", "file", "--log-level", "info", "categories"])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "skillplan categories should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );

    let log_path = expected_log_path(&temp_dir.path().join("state"));
    assert!(
        log_path.exists(),
        "log file should exist at {}",
        log_path.display()
    );
    let content = fs::read_to_string(&log_path).unwrap();
    assert!(
        content.contains("skillplan starting"),
        "log file should contain a startup message; got: {}",
        content.lines().next().unwrap_or("")
    );
    assert!(String::from_utf8_lossy(&output.stderr).trim().is_empty());
}

#[test]
fn test_quiet_emits_no_logs() {
    let temp_dir = TempDir::new().unwrap();
    let output = isolated_command(&temp_dir)
        .args(["--quiet", "--log-level", "trace", "template"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).trim().is_empty());
    assert!(String::from_utf8_lossy(&output.stdout).contains("{skill}"));
}
