// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Integration tests for the `pledge` binary.
//! Each test runs the built executable and checks its stdout and exit code.

use std::path::PathBuf;
use std::process::{Command, Output};

fn pledge_binary() -> PathBuf {
    // cargo test builds into target/debug or target/release
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    if path.ends_with("deps") {
        path.pop();
    }
    path.push(format!("pledge{}", std::env::consts::EXE_SUFFIX));
    path
}

/// Run `pledge` in a fixed environment, then apply `env` on top.
fn pledge_with_env(args: &[&str], env: &[(&str, &str)]) -> Output {
    Command::new(pledge_binary())
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("PLEDGE_TASK_BUDGET")
        .env_remove("RUST_LOG")
        .envs(env.iter().copied())
        .output()
        .expect("failed to run pledge")
}

fn pledge(args: &[&str]) -> Output {
    pledge_with_env(args, &[])
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).to_string()
}

#[test]
fn full_suite_passes() {
    let out = pledge(&["conformance"]);
    let text = stdout(&out);
    assert!(
        out.status.success(),
        "pledge conformance failed:\nstdout: {}\nstderr: {}",
        text,
        String::from_utf8_lossy(&out.stderr),
    );
    assert!(text.contains("Section 2.1"));
    assert!(text.contains("Section 2.3"));
    assert!(text.contains("0 failed"));
}

#[test]
fn json_report_for_one_section() {
    let out = pledge(&["conformance", "--filter", "2.2", "--json"]);
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid json");
    assert_eq!(report["filter"], "2.2");
    assert_eq!(report["summary"]["failed"], 0);
    let cases = report["cases"].as_array().expect("cases array");
    assert!(!cases.is_empty());
    assert!(cases
        .iter()
        .all(|c| c["id"].as_str().is_some_and(|id| id.starts_with("2.2."))));
}

#[test]
fn budget_from_environment_is_reported() {
    let out = pledge_with_env(
        &["conformance", "--filter", "2.3.1", "--json"],
        &[("PLEDGE_TASK_BUDGET", "32")],
    );
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid json");
    assert_eq!(report["task_budget"], 32);
}

#[test]
fn budget_flag_beats_environment() {
    let out = pledge_with_env(
        &["conformance", "--filter", "2.3.1", "--budget", "8", "--json"],
        &[("PLEDGE_TASK_BUDGET", "32")],
    );
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid json");
    assert_eq!(report["task_budget"], 8);
}

#[test]
fn unmatched_filter_fails() {
    let out = pledge(&["conformance", "--filter", "9.9"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("no cases match"));
}

#[test]
fn usage_errors_exit_2() {
    assert_eq!(pledge(&["conformance", "--budget", "zero"]).status.code(), Some(2));
    assert_eq!(pledge(&["conformance", "--bogus"]).status.code(), Some(2));
    assert_eq!(pledge(&["frobnicate"]).status.code(), Some(2));
}

#[test]
fn list_shows_ids() {
    let out = pledge(&["list"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("2.1.1"));
    assert!(text.contains("2.3.3.1"));
}

#[test]
fn version() {
    let out = pledge(&["version"]);
    assert_eq!(stdout(&out).trim(), format!("pledge {}", env!("CARGO_PKG_VERSION")));
}
