// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Spec §8 scenario 4: tlog replay after a kill -9. A truncated final line
//! (no trailing newline, as a `write()` interrupted mid-append would leave)
//! is dropped rather than aborting recovery of the entries before it.

use hearth_config::{ConfigTree, TLog};
use hearth_core::NodePath;
use serde_json::json;

#[test]
fn replay_recovers_committed_entries_and_drops_a_truncated_tail() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("config.tlog");

    {
        let mut tlog = TLog::open(&log_path).unwrap();
        tlog.append_set(1, &NodePath::new(["services", "a", "port"]), &json!(8080)).unwrap();
        tlog.append_set(2, &NodePath::new(["services", "a", "enabled"]), &json!(true)).unwrap();
        tlog.append_remove(3, &NodePath::new(["services", "a", "enabled"])).unwrap();
    }

    // Simulate a kill -9 mid-append: append a partial line with no trailing
    // newline directly onto the file.
    use std::io::Write;
    let mut raw = std::fs::OpenOptions::new().append(true).open(&log_path).unwrap();
    raw.write_all(b"4\ts\tservices/a/timeo").unwrap();

    let tree = ConfigTree::new();
    let applied = TLog::replay_into(&log_path, &tree).unwrap();
    assert_eq!(applied, 3);

    let port = tree.lookup(&NodePath::new(["services", "a", "port"]), json!(null));
    assert_eq!(port.value, Some(json!(8080)));

    let enabled = tree.lookup(&NodePath::new(["services", "a", "enabled"]), json!(null));
    assert_eq!(enabled.value, None);

    assert!(tree.find(&NodePath::new(["services", "a", "timeo"])).is_none());
}

#[test]
fn replay_skips_a_malformed_interior_line_and_keeps_going() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("config.tlog");

    std::fs::write(
        &log_path,
        "1\ts\tservices/a/port\t8080\nnot-a-valid-entry\n2\ts\tservices/a/name\t\"web\"\n",
    )
    .unwrap();

    let tree = ConfigTree::new();
    let applied = TLog::replay_into(&log_path, &tree).unwrap();
    assert_eq!(applied, 2);

    let name = tree.lookup(&NodePath::new(["services", "a", "name"]), json!(null));
    assert_eq!(name.value, Some(json!("web")));
}
