// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

use super::*;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn captures_stdout_and_exit_code() {
    let runner = ShellRunner::new();
    let spec = ExecSpec::new("sh").arg("-c").arg("echo ok; exit 0");
    let cancel = CancellationToken::new();
    let out = runner.run(&spec, &cancel).await.unwrap();
    assert_eq!(out.outcome, Outcome::Exited(0));
    assert_eq!(out.stdout_string().trim(), "ok");
    assert!(out.success());
}

#[tokio::test]
async fn captures_nonzero_exit_and_stderr() {
    let runner = ShellRunner::new();
    let spec = ExecSpec::new("sh").arg("-c").arg("echo boom 1>&2; exit 7");
    let cancel = CancellationToken::new();
    let out = runner.run(&spec, &cancel).await.unwrap();
    assert_eq!(out.outcome, Outcome::Exited(7));
    assert_eq!(out.stderr_string().trim(), "boom");
    assert!(!out.success());
}

#[tokio::test]
async fn honors_cwd_and_env() {
    let runner = ShellRunner::new();
    let dir = tempfile::tempdir().unwrap();
    let spec = ExecSpec::new("sh")
        .arg("-c")
        .arg("pwd; echo $GREETING")
        .cwd(dir.path())
        .env("GREETING", "hi there");
    let cancel = CancellationToken::new();
    let out = runner.run(&spec, &cancel).await.unwrap();
    let lines: Vec<&str> = out.stdout_string().lines().collect();
    assert_eq!(std::fs::canonicalize(lines[0]).unwrap(), std::fs::canonicalize(dir.path()).unwrap());
    assert_eq!(lines[1], "hi there");
}

#[tokio::test]
async fn timeout_kills_child() {
    let runner = ShellRunner::new();
    let spec = ExecSpec::new("sh").arg("-c").arg("sleep 30").timeout(Duration::from_millis(50));
    let cancel = CancellationToken::new();
    let start = std::time::Instant::now();
    let out = runner.run(&spec, &cancel).await.unwrap();
    assert_eq!(out.outcome, Outcome::TimedOut);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn cancellation_token_kills_child() {
    let runner = ShellRunner::new();
    let spec = ExecSpec::new("sh").arg("-c").arg("sleep 30");
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel_clone.cancel();
    });
    let out = runner.run(&spec, &cancel).await.unwrap();
    assert_eq!(out.outcome, Outcome::Cancelled);
}

#[tokio::test]
async fn spawn_failure_reports_command_name() {
    let runner = ShellRunner::new();
    let spec = ExecSpec::new("definitely-not-a-real-binary-xyz");
    let cancel = CancellationToken::new();
    let err = runner.run(&spec, &cancel).await.unwrap_err();
    assert!(matches!(err, ShellError::SpawnFailed { .. }));
}
