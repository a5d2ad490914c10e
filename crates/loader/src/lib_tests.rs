// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

use super::*;
use std::os::unix::fs::symlink as unix_symlink;
use tempfile::tempdir;
use yare::parameterized;

fn make_dist(alts_dir: &Path, name: &str) -> PathBuf {
    let dist = alts_dir.join(name);
    std::fs::create_dir_all(dist.join("bin")).unwrap();
    std::fs::write(dist.join("bin").join("hearthd"), "#!/bin/sh\nexit 0\n").unwrap();
    dist
}

#[test]
fn promote_and_resolve_launches_plain_current() {
    let tmp = tempdir().unwrap();
    let alts = tmp.path();
    let dist = make_dist(alts, "init");
    unix_symlink(&dist, alts.join("current")).unwrap();

    let current = promote_and_resolve_current(alts).unwrap();
    assert_eq!(std::fs::read_link(&current).unwrap(), dist);
}

#[test]
fn promote_and_resolve_promotes_new_over_current() {
    let tmp = tempdir().unwrap();
    let alts = tmp.path();
    let old_dist = make_dist(alts, "v1");
    let new_dist = make_dist(alts, "v2");
    unix_symlink(&old_dist, alts.join("current")).unwrap();
    unix_symlink(&new_dist, alts.join("new")).unwrap();

    promote_and_resolve_current(alts).unwrap();

    assert_eq!(std::fs::read_link(alts.join("current")).unwrap(), new_dist);
    assert_eq!(std::fs::read_link(alts.join("old")).unwrap(), old_dist);
    assert!(alts.join("new").symlink_metadata().is_err());
}

#[test]
fn promote_and_resolve_rejects_unreachable_layout() {
    let tmp = tempdir().unwrap();
    let alts = tmp.path();
    let new_dist = make_dist(alts, "v2");
    let old_dist = make_dist(alts, "v1");
    unix_symlink(&new_dist, alts.join("new")).unwrap();
    unix_symlink(&old_dist, alts.join("old")).unwrap();

    assert!(promote_and_resolve_current(alts).is_err());
}

#[test]
fn hearthd_binary_found_beneath_current() {
    let tmp = tempdir().unwrap();
    let dist = make_dist(tmp.path(), "init");

    let bin = hearthd_binary(&dist).unwrap();
    assert_eq!(bin, dist.join("bin").join("hearthd"));
}

#[test]
fn hearthd_binary_missing_is_an_error() {
    let tmp = tempdir().unwrap();
    assert!(hearthd_binary(tmp.path()).is_err());
}

#[parameterized(
    normal_exit = { 0 },
    interrupted = { 130 },
    unrecognized = { 7 },
)]
fn next_step_stops_on_non_restart_codes(code: i32) {
    assert_eq!(next_step(code), NextStep::Stop { exit_code: code });
}

#[test]
fn next_step_relaunches_on_100() {
    assert_eq!(next_step(100), NextStep::Relaunch);
}

#[test]
fn next_step_reboots_on_101() {
    assert_eq!(next_step(101), NextStep::Reboot);
}
