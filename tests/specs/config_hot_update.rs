// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Spec §8 scenario 3: config hot-update. A subscriber on a running
//! component's config subtree observes an accepted write, and a stale write
//! (timestamp no later than the node's current modtime) is rejected
//! entirely and never reaches the subscriber.

use std::sync::{Arc, Mutex};

use hearth_config::{ConfigTree, PublishQueue, WhatHappened};
use hearth_core::NodePath;
use serde_json::json;

#[test]
fn accepted_write_notifies_subscriber_after_drain() {
    let config = ConfigTree::with_publish_queue(PublishQueue::start());
    let path = NodePath::new(["services", "web", "port"]);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    config.subscribe(&path, Arc::new(move |what, snapshot, _path| {
        seen_clone.lock().unwrap().push((what, snapshot.value.clone()));
    }));

    assert!(config.set_value(&path, json!(8080), 10, false));
    config.publish_queue().drain();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], (WhatHappened::ChildAdded, Some(json!(8080))));
}

#[test]
fn stale_write_is_rejected_and_never_notifies() {
    let config = ConfigTree::with_publish_queue(PublishQueue::start());
    let path = NodePath::new(["services", "web", "port"]);

    assert!(config.set_value(&path, json!(8080), 10, false));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    config.subscribe(&path, Arc::new(move |what, snapshot, _path| {
        seen_clone.lock().unwrap().push((what, snapshot.value.clone()));
    }));

    // Same or earlier timestamp than the existing modtime: must be rejected.
    assert!(!config.set_value(&path, json!(9090), 10, false));
    assert!(!config.set_value(&path, json!(9090), 5, false));
    config.publish_queue().drain();

    assert!(seen.lock().unwrap().is_empty());
    let current = config.lookup(&path, json!(null));
    assert_eq!(current.value, Some(json!(8080)));
}

#[test]
fn force_overrides_the_modtime_gate() {
    let config = ConfigTree::with_publish_queue(PublishQueue::start());
    let path = NodePath::new(["services", "web", "port"]);

    assert!(config.set_value(&path, json!(8080), 10, false));
    assert!(config.set_value(&path, json!(9090), 1, true));

    let current = config.lookup(&path, json!(null));
    assert_eq!(current.value, Some(json!(9090)));
}
