// crates/propbind-cli/tests/cli_commands.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Integration tests for the propbind binary.
// Purpose: Ensure commands exit with the right status and never print secrets.
// Dependencies: propbind-cli binary
// ============================================================================

//! ## Overview
//! Runs the `propbind` binary for each subcommand and checks exit status,
//! stdout, and stderr.
//!
//! Security posture: property inputs are untrusted; rejected configs must fail
//! closed without echoing sensitive values.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn propbind_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_propbind"))
}

fn run(args: &[&str]) -> Output {
    Command::new(propbind_bin()).args(args).env_remove("RUST_LOG").output().expect("run propbind")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Verifies `kinds` lists every configuration kind.
#[test]
fn cli_kinds_lists_every_kind() {
    let output = run(&["kinds"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let kinds: Vec<&str> = stdout.lines().collect();
    assert_eq!(kinds, vec!["mysql-event-listener", "lakehouse", "openlineage-transport"]);
}

/// Verifies a valid property file passes and prints the redacted view.
#[test]
fn cli_check_accepts_valid_properties() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("mysql.properties");
    fs::write(
        &path,
        "# listener\nmysql-event-listener.db.url=jdbc:mysql://example.net:3306\n\
         mysql-event-listener.db.password=hunter2\n",
    )
    .expect("write properties");

    let output = run(&["check", "--kind", "mysql-event-listener", "--file", path.to_string_lossy().as_ref()]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("mysql-event-listener.db.password=[REDACTED]"));
    assert!(!stdout.contains("hunter2"));
}

/// Verifies invalid properties fail closed with every finding on stderr.
#[test]
fn cli_check_rejects_invalid_properties() {
    let output = run(&[
        "check",
        "--kind",
        "mysql-event-listener",
        "--set",
        "mysql-event-listener.db.url=jdbc:postgresql://example.net:5432/db",
        "--set",
        "mysql-event-listener.db.password=hunter2",
    ]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid JDBC URL for MySQL event listener"));
    assert!(!stderr.contains("hunter2"));
    assert!(!stderr.contains("postgresql"));
}

/// Verifies `schema` prints a parseable JSON Schema.
#[test]
fn cli_schema_prints_json_schema() {
    let output = run(&["schema", "--kind", "lakehouse", "--strict"]);
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).expect("schema json");
    assert_eq!(schema["additionalProperties"], serde_json::Value::Bool(false));
    assert!(schema["properties"]["lakehouse.table-type"].is_object());
}

/// Verifies `docs --check` detects drift in a written reference.
#[test]
fn cli_docs_check_detects_drift() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("lakehouse.md");
    let path_arg = path.to_string_lossy().to_string();

    let output = run(&["docs", "--kind", "lakehouse", "--output", &path_arg]);
    assert!(output.status.success());
    let output = run(&["docs", "--kind", "lakehouse", "--output", &path_arg, "--check"]);
    assert!(output.status.success());

    fs::write(&path, "stale\n").expect("overwrite docs");
    let output = run(&["docs", "--kind", "lakehouse", "--output", &path_arg, "--check"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("docs drift"));
}
