// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! CLI-level behavior of the `hearthd` binary itself: the process-exit
//! contract's `0` leg for a boot-only invocation, and the exclusive lock
//! refusing a second instance against the same root (spec §2 step 1, §6).

use std::thread;
use std::time::Duration;

use assert_cmd::Command;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use serial_test::serial;

#[test]
#[serial]
fn boot_only_invocation_exits_zero() {
    let tmp = tempfile::tempdir().unwrap();
    Command::cargo_bin("hearthd")
        .unwrap()
        .args(["--root", tmp.path().to_str().unwrap(), "--start", "false"])
        .assert()
        .success();
}

#[test]
#[serial]
fn second_instance_against_same_root_is_refused() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().to_str().unwrap().to_string();

    let mut first = Command::cargo_bin("hearthd").unwrap();
    first.args(["--root", &root]);
    let mut child = first.spawn().unwrap();

    // Give the daemon time to acquire its lock and finish booting.
    thread::sleep(Duration::from_millis(500));

    Command::cargo_bin("hearthd")
        .unwrap()
        .args(["--root", &root, "--start", "false"])
        .assert()
        .failure();

    kill(Pid::from_raw(child.id() as i32), Signal::SIGTERM).unwrap();
    let status = child.wait().unwrap();
    assert_eq!(status.code(), Some(0));
}
