// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

use super::*;
use serde_json::json;
use std::io::Write as _;

fn temp_path(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("hearth-tlog-test-{}-{}", std::process::id(), name));
    p
}

#[test]
fn append_and_replay_round_trips_set_and_remove() {
    let path = temp_path("roundtrip");
    let _ = std::fs::remove_file(&path);

    {
        let mut log = TLog::open(&path).unwrap();
        log.append_set(1, &NodePath::from(&["services", "web", "state"][..]), &json!("RUNNING")).unwrap();
        log.append_set(2, &NodePath::from(&["services", "web", "port"][..]), &json!(8080)).unwrap();
        log.append_remove(3, &NodePath::from(&["services", "web", "port"][..])).unwrap();
    }

    let entries = TLog::replay(&path, |_, _| panic!("no corrupt lines expected")).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].op, TLogOp::Set);
    assert_eq!(entries[0].timestamp, 1);
    assert_eq!(entries[2].op, TLogOp::Remove);
    assert_eq!(entries[2].value, None);

    std::fs::remove_file(&path).ok();
}

#[test]
fn replay_into_tree_applies_entries_in_order() {
    let path = temp_path("replay-into");
    let _ = std::fs::remove_file(&path);
    {
        let mut log = TLog::open(&path).unwrap();
        log.append_set(1, &NodePath::from(&["a", "b"][..]), &json!(1)).unwrap();
        log.append_set(2, &NodePath::from(&["a", "b"][..]), &json!(2)).unwrap();
    }
    let tree = ConfigTree::new();
    let applied = TLog::replay_into(&path, &tree).unwrap();
    assert_eq!(applied, 2);
    assert_eq!(tree.find(&NodePath::from(&["a", "b"][..])).unwrap().value, Some(json!(2)));
    tree.publish_queue().shutdown();
    std::fs::remove_file(&path).ok();
}

#[test]
fn truncated_final_line_is_dropped_not_fatal() {
    let path = temp_path("truncated");
    let _ = std::fs::remove_file(&path);
    {
        let mut log = TLog::open(&path).unwrap();
        log.append_set(1, &NodePath::from(&["a"][..]), &json!(1)).unwrap();
    }
    // Append a partial line with no trailing newline, as a kill -9 would leave.
    {
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        write!(file, "2\ts\ta/b").unwrap();
    }
    let mut corrupt_count = 0;
    let entries = TLog::replay(&path, |_, _| corrupt_count += 1).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(corrupt_count, 0, "a truncated trailing line must not be treated as corrupt");
    std::fs::remove_file(&path).ok();
}

#[test]
fn malformed_middle_line_is_skipped_and_reported() {
    let path = temp_path("malformed-middle");
    let _ = std::fs::remove_file(&path);
    {
        let mut file = File::create(&path).unwrap();
        writeln!(file, "1\ts\ta\t1").unwrap();
        writeln!(file, "not-a-valid-line-at-all").unwrap();
        writeln!(file, "3\ts\tb\t2").unwrap();
    }
    let mut corrupt_lines = Vec::new();
    let entries = TLog::replay(&path, |line, _| corrupt_lines.push(line)).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(corrupt_lines, vec![2]);
    std::fs::remove_file(&path).ok();
}

#[test]
fn dump_tlog_writes_one_set_entry_per_leaf() {
    let tree = ConfigTree::new();
    tree.set_value(&NodePath::from(&["a", "b"][..]), json!(1), 5, false);
    tree.set_value(&NodePath::from(&["a", "c"][..]), json!(2), 9, false);
    let path = temp_path("dump");
    let _ = std::fs::remove_file(&path);
    TLog::dump_tlog(&path, &tree).unwrap();
    let entries = TLog::replay(&path, |_, _| panic!("unexpected corrupt line")).unwrap();
    assert_eq!(entries.len(), 2);
    tree.publish_queue().shutdown();
    std::fs::remove_file(&path).ok();
}

#[test]
fn archive_compressed_replaces_plain_log_with_zst() {
    let path = temp_path("archive");
    let _ = std::fs::remove_file(&path);
    {
        let mut log = TLog::open(&path).unwrap();
        log.append_set(1, &NodePath::from(&["a"][..]), &json!(1)).unwrap();
    }
    let archived = TLog::archive_compressed(&path).unwrap();
    assert!(archived.exists());
    assert!(!path.exists());
    std::fs::remove_file(&archived).ok();
}

#[test]
fn merge_tlog_into_config_with_force_timestamp_overrides_newer_value() {
    let path = temp_path("merge-force");
    let _ = std::fs::remove_file(&path);
    {
        let mut log = TLog::open(&path).unwrap();
        log.append_set(1, &NodePath::from(&["a", "b"][..]), &json!("snapshot")).unwrap();
    }
    let tree = ConfigTree::new();
    // A newer value already in the tree would normally win.
    tree.set_value(&NodePath::from(&["a", "b"][..]), json!("live"), 100, false);

    let applied = TLog::merge_tlog_into_config(&path, &tree, true, None).unwrap();
    assert_eq!(applied, 1);
    assert_eq!(tree.find(&NodePath::from(&["a", "b"][..])).unwrap().value, Some(json!("snapshot")));
    tree.publish_queue().shutdown();
    std::fs::remove_file(&path).ok();
}

#[test]
fn merge_tlog_into_config_predicate_excludes_paths() {
    let path = temp_path("merge-predicate");
    let _ = std::fs::remove_file(&path);
    {
        let mut log = TLog::open(&path).unwrap();
        log.append_set(1, &NodePath::from(&["runtime", "pid"][..]), &json!(123)).unwrap();
        log.append_set(2, &NodePath::from(&["services", "web"][..]), &json!("ok")).unwrap();
    }
    let tree = ConfigTree::new();
    let predicate: &dyn Fn(&NodePath) -> bool =
        &|path| !NodePath::from(&["runtime"][..]).is_prefix_of(path);
    let applied = TLog::merge_tlog_into_config(&path, &tree, true, Some(predicate)).unwrap();
    assert_eq!(applied, 1);
    assert!(tree.find(&NodePath::from(&["runtime", "pid"][..])).is_none());
    assert_eq!(tree.find(&NodePath::from(&["services", "web"][..])).unwrap().value, Some(json!("ok")));
    tree.publish_queue().shutdown();
    std::fs::remove_file(&path).ok();
}

#[test]
fn mirror_to_streams_entries_in_file_order() {
    let path = temp_path("mirror");
    let _ = std::fs::remove_file(&path);
    {
        let mut log = TLog::open(&path).unwrap();
        log.append_set(1, &NodePath::from(&["a"][..]), &json!(1)).unwrap();
        log.append_set(2, &NodePath::from(&["b"][..]), &json!(2)).unwrap();
    }
    let mut mirrored = Vec::new();
    let sent = TLog::mirror_to(&path, |entry| mirrored.push(entry.clone())).unwrap();
    assert_eq!(sent, 2);
    assert_eq!(mirrored[0].timestamp, 1);
    assert_eq!(mirrored[1].timestamp, 2);
    std::fs::remove_file(&path).ok();
}

#[test]
fn quarantine_renames_the_log_aside() {
    let path = temp_path("quarantine");
    let _ = std::fs::remove_file(&path);
    TLog::open(&path).unwrap();
    let backup = TLog::quarantine(&path, 42).unwrap();
    assert!(backup.exists());
    assert!(!path.exists());
    std::fs::remove_file(&backup).ok();
}
