// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! ConfigTree: a hierarchical, timestamped key/value tree with subscriber
//! notifications.
//!
//! Internally an arena of nodes addressed by integer handle: nodes hold
//! integer handles and back-edges are lookups, rather than parent/child
//! pointers, which keeps the tree's cyclic shape out of Rust's ownership
//! graph.

// Every `unwrap`/`expect` below is indexing into the arena through a handle
// this module itself just produced (a parent id, a child id from an
// IndexMap entry); a panic here means the arena's own invariants broke, not
// a caller input problem.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::publish_queue::PublishQueue;
use crate::subscriber::{SubscriberFn, SubscriberId, WhatHappened};
use crate::validator::{self, ValidatorFn};
use hearth_core::path::Segment;
use hearth_core::NodePath;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

pub(crate) type NodeId = usize;
const ROOT: NodeId = 0;

#[derive(Clone, Debug)]
enum NodeKind {
    Leaf { value: Value },
    Container { children: IndexMap<Segment, NodeId> },
    /// A placeholder a `subscribe` call materialized ahead of any write, so
    /// the subscriber id has a stable `NodeId` to register against before
    /// the caller's data decides whether this path ends up a leaf or a
    /// container. Never observable through `find`/`to_pojo`/notifications;
    /// `set_value`/`ensure_container_path` upgrade it in place on first use.
    Unresolved,
}

#[derive(Clone, Debug)]
struct NodeEntry {
    parent: Option<NodeId>,
    name: Segment,
    modtime: u64,
    kind: NodeKind,
}

/// An immutable snapshot of a node, handed to subscriber callbacks and to
/// callers reading a node's current value. Decoupled from the arena so it
/// can safely cross the PublishQueue boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    pub path: NodePath,
    pub modtime: u64,
    /// `Some(value)` for a leaf, `None` for a container.
    pub value: Option<Value>,
}

impl NodeSnapshot {
    pub fn is_container(&self) -> bool {
        self.value.is_none()
    }
}

struct Inner {
    nodes: Vec<Option<NodeEntry>>,
    /// Subscribers keyed by the node id they were registered against.
    subscribers: std::collections::HashMap<NodeId, Vec<(SubscriberId, SubscriberFn)>>,
    validators: std::collections::HashMap<NodeId, ValidatorFn>,
}

impl Inner {
    fn path_of(&self, mut id: NodeId) -> NodePath {
        let mut segments = Vec::new();
        while let Some(entry) = self.nodes[id].as_ref() {
            if entry.parent.is_none() {
                break;
            }
            segments.push(entry.name.clone());
            id = entry.parent.unwrap();
        }
        segments.reverse();
        NodePath::new(segments)
    }

    fn snapshot(&self, id: NodeId) -> NodeSnapshot {
        let entry = self.nodes[id].as_ref().expect("snapshot of removed node");
        let value = match &entry.kind {
            NodeKind::Leaf { value } => Some(value.clone()),
            NodeKind::Container { .. } | NodeKind::Unresolved => None,
        };
        NodeSnapshot { path: self.path_of(id), modtime: entry.modtime, value }
    }
}

/// The hierarchical, timestamped key/value tree.
pub struct ConfigTree {
    inner: Mutex<Inner>,
    publish: PublishQueue,
    next_subscriber_id: AtomicU64,
}

impl ConfigTree {
    /// Create an empty tree with its own dedicated publish queue.
    pub fn new() -> Self {
        Self::with_publish_queue(PublishQueue::start())
    }

    /// Create an empty tree that publishes notifications onto an existing,
    /// shared [`PublishQueue`] (the usual case: one queue per daemon).
    pub fn with_publish_queue(publish: PublishQueue) -> Self {
        let root = NodeEntry {
            parent: None,
            name: Segment::default(),
            modtime: 0,
            kind: NodeKind::Container { children: IndexMap::new() },
        };
        Self {
            inner: Mutex::new(Inner {
                nodes: vec![Some(root)],
                subscribers: std::collections::HashMap::new(),
                validators: std::collections::HashMap::new(),
            }),
            publish,
            next_subscriber_id: AtomicU64::new(1),
        }
    }

    pub fn publish_queue(&self) -> &PublishQueue {
        &self.publish
    }

    // -- traversal -----------------------------------------------------

    /// Never creates; returns `None` if any segment is missing, and for a
    /// path only ever touched by `subscribe` (a subscribe-only placeholder,
    /// never written).
    pub fn find(&self, path: &NodePath) -> Option<NodeSnapshot> {
        let inner = self.inner.lock();
        let id = Self::traverse(&inner, path)?;
        if matches!(inner.nodes[id].as_ref()?.kind, NodeKind::Unresolved) {
            return None;
        }
        Some(inner.snapshot(id))
    }

    fn traverse(inner: &Inner, path: &NodePath) -> Option<NodeId> {
        let mut current = ROOT;
        for seg in path.segments() {
            let entry = inner.nodes[current].as_ref()?;
            match &entry.kind {
                NodeKind::Container { children } => {
                    current = *children.get(seg)?;
                }
                NodeKind::Leaf { .. } | NodeKind::Unresolved => return None,
            }
        }
        Some(current)
    }

    /// Idempotently creates the leaf (and intermediate containers) if
    /// absent. `default` is applied only when the node is freshly created.
    pub fn lookup(&self, path: &NodePath, default: Value) -> NodeSnapshot {
        let mut inner = self.inner.lock();
        let id = Self::lookup_leaf_id(&mut inner, path, default);
        inner.snapshot(id)
    }

    fn lookup_leaf_id(inner: &mut Inner, path: &NodePath, default: Value) -> NodeId {
        let parent = Self::ensure_container_path(inner, &path.segments()[..path.len().saturating_sub(1)]);
        let Some((_, name)) = path.split_last() else {
            return ROOT;
        };
        let name = Segment::from(name);

        let existing = match &inner.nodes[parent].as_ref().unwrap().kind {
            NodeKind::Container { children } => children.get(&name).copied(),
            NodeKind::Leaf { .. } | NodeKind::Unresolved => None,
        };
        if let Some(id) = existing {
            // A `subscribe`-only placeholder resolves into a leaf on first
            // use, in place, so its subscribers stay attached.
            let entry = inner.nodes[id].as_mut().unwrap();
            if matches!(entry.kind, NodeKind::Unresolved) {
                entry.kind = NodeKind::Leaf { value: default };
            }
            return id;
        }

        let id = inner.nodes.len();
        inner.nodes.push(Some(NodeEntry {
            parent: Some(parent),
            name: name.clone(),
            modtime: 0,
            kind: NodeKind::Leaf { value: default },
        }));
        if let NodeKind::Container { children } = &mut inner.nodes[parent].as_mut().unwrap().kind {
            children.insert(name, id);
        }
        id
    }

    /// Idempotently creates the container (and intermediates) if absent.
    pub fn lookup_container(&self, path: &NodePath) -> NodeSnapshot {
        let mut inner = self.inner.lock();
        let id = Self::ensure_container_path(&mut inner, path.segments());
        inner.snapshot(id)
    }

    /// Ensures every segment in `segments` is a real container, upgrading
    /// any `subscribe`-only `Unresolved` placeholder found along the way in
    /// place (same `NodeId`, so subscribers registered against it stay
    /// attached) rather than allocating a fresh node under it.
    fn ensure_container_path(inner: &mut Inner, segments: &[Segment]) -> NodeId {
        let mut current = ROOT;
        Self::upgrade_to_container(inner, current);
        for seg in segments {
            let existing = match &inner.nodes[current].as_ref().unwrap().kind {
                NodeKind::Container { children } => children.get(seg).copied(),
                NodeKind::Leaf { .. } | NodeKind::Unresolved => None,
            };
            current = match existing {
                Some(id) => id,
                None => {
                    let id = inner.nodes.len();
                    inner.nodes.push(Some(NodeEntry {
                        parent: Some(current),
                        name: seg.clone(),
                        modtime: 0,
                        kind: NodeKind::Container { children: IndexMap::new() },
                    }));
                    if let NodeKind::Container { children } =
                        &mut inner.nodes[current].as_mut().unwrap().kind
                    {
                        children.insert(seg.clone(), id);
                    }
                    id
                }
            };
            Self::upgrade_to_container(inner, current);
        }
        current
    }

    fn upgrade_to_container(inner: &mut Inner, id: NodeId) {
        let entry = inner.nodes[id].as_mut().unwrap();
        if matches!(entry.kind, NodeKind::Unresolved) {
            entry.kind = NodeKind::Container { children: IndexMap::new() };
        }
    }

    /// Ensures a node exists at `segments` without deciding whether it ends
    /// up a leaf or a container: the terminal segment is created as
    /// `Unresolved` if absent, everything above it as a real container.
    /// Used by `subscribe`, which must not force container semantics onto a
    /// path that a later `set_value` needs to write a leaf to (spec §3: a
    /// subscriber may attach before the node it targets exists).
    fn ensure_node_path(inner: &mut Inner, segments: &[Segment]) -> NodeId {
        let Some((name, parents)) = segments.split_last() else {
            return ROOT;
        };
        let parent = Self::ensure_container_path(inner, parents);
        let existing = match &inner.nodes[parent].as_ref().unwrap().kind {
            NodeKind::Container { children } => children.get(name).copied(),
            NodeKind::Leaf { .. } | NodeKind::Unresolved => None,
        };
        if let Some(id) = existing {
            return id;
        }
        let id = inner.nodes.len();
        inner.nodes.push(Some(NodeEntry {
            parent: Some(parent),
            name: name.clone(),
            modtime: 0,
            kind: NodeKind::Unresolved,
        }));
        if let NodeKind::Container { children } = &mut inner.nodes[parent].as_mut().unwrap().kind {
            children.insert(name.clone(), id);
        }
        id
    }

    // -- mutation --------------------------------------------------------

    /// Write a leaf. Rejected (returns `false`) if `timestamp <= node.modtime`
    /// and not `force`. On acceptance: updates modtime, runs the validator,
    /// enqueues a `childChanged` notification.
    pub fn set_value(&self, path: &NodePath, value: Value, timestamp: u64, force: bool) -> bool {
        let (id, accepted_value, old_value, is_new) = {
            let mut inner = self.inner.lock();
            let parent_segments = &path.segments()[..path.len().saturating_sub(1)];
            let parent = Self::ensure_container_path(&mut inner, parent_segments);
            let Some((_, name)) = path.split_last() else {
                return false;
            };
            let name = Segment::from(name);

            let existing = match &inner.nodes[parent].as_ref().unwrap().kind {
                NodeKind::Container { children } => children.get(&name).copied(),
                NodeKind::Leaf { .. } | NodeKind::Unresolved => None,
            };

            // `is_new` drives the notification kind (`ChildAdded` vs
            // `ChildChanged`); `allocate_new` drives whether a fresh `NodeId`
            // is pushed or an existing entry is mutated in place. A
            // `subscribe`-only placeholder is `is_new` (no committed value
            // existed) but not `allocate_new` (its id must be reused so the
            // subscriber stays attached).
            let (id, old_modtime, old_value, is_new, allocate_new) = match existing {
                Some(id) => {
                    let entry = inner.nodes[id].as_ref().unwrap();
                    match &entry.kind {
                        NodeKind::Leaf { value } => (id, entry.modtime, value.clone(), false, false),
                        NodeKind::Container { .. } => {
                            // A container occupies this name; refuse to clobber it
                            // with a leaf write.
                            return false;
                        }
                        NodeKind::Unresolved => (id, 0, Value::Null, true, false),
                    }
                }
                None => (usize::MAX, 0, Value::Null, true, true),
            };

            if !is_new && timestamp <= old_modtime && !force {
                return false;
            }

            let accepted = if let Some(validator) = inner.validators.get(&id) {
                validator::apply(validator.as_ref(), &value, &old_value)
            } else {
                value
            };

            let id = if allocate_new {
                let id = inner.nodes.len();
                inner.nodes.push(Some(NodeEntry {
                    parent: Some(parent),
                    name: name.clone(),
                    modtime: timestamp,
                    kind: NodeKind::Leaf { value: accepted.clone() },
                }));
                if let NodeKind::Container { children } =
                    &mut inner.nodes[parent].as_mut().unwrap().kind
                {
                    children.insert(name, id);
                }
                id
            } else {
                let entry = inner.nodes[id].as_mut().unwrap();
                entry.modtime = timestamp;
                entry.kind = NodeKind::Leaf { value: accepted.clone() };
                id
            };

            (id, accepted, old_value, is_new)
        };

        let what = if is_new { WhatHappened::ChildAdded } else { WhatHappened::ChildChanged };
        let _ = old_value;
        self.notify(id, what);
        true
    }

    /// Tombstones a node (leaf or whole subtree); enqueues `childRemoved`.
    pub fn remove(&self, path: &NodePath, timestamp: u64) -> bool {
        let (parent, id) = {
            let mut inner = self.inner.lock();
            let Some(id) = Self::traverse(&inner, path) else { return false };
            if id == ROOT {
                return false;
            }
            if matches!(inner.nodes[id].as_ref().unwrap().kind, NodeKind::Unresolved) {
                // A subscribe-only placeholder was never really written; there
                // is nothing here to remove.
                return false;
            }
            let parent = inner.nodes[id].as_ref().unwrap().parent.unwrap();
            let modtime = inner.nodes[id].as_ref().unwrap().modtime;
            if timestamp <= modtime {
                return false;
            }
            if let NodeKind::Container { children } =
                &mut inner.nodes[parent].as_mut().unwrap().kind
            {
                let name = inner.nodes[id].as_ref().unwrap().name.clone();
                children.shift_remove(&name);
            }
            Self::tombstone_subtree(&mut inner, id);
            inner.subscribers.remove(&id);
            inner.validators.remove(&id);
            (parent, id)
        };
        let _ = parent;
        self.notify_removed(path, timestamp);
        true
    }

    fn tombstone_subtree(inner: &mut Inner, id: NodeId) {
        let children: Vec<NodeId> = match &inner.nodes[id].as_ref().unwrap().kind {
            NodeKind::Container { children } => children.values().copied().collect(),
            NodeKind::Leaf { .. } | NodeKind::Unresolved => Vec::new(),
        };
        for child in children {
            Self::tombstone_subtree(inner, child);
            inner.subscribers.remove(&child);
            inner.validators.remove(&child);
        }
        inner.nodes[id] = None;
    }

    /// Structural merge: for every key in `map`, recurse into a container
    /// or set a leaf, all stamped with `timestamp`.
    pub fn merge_map(&self, timestamp: u64, map: &serde_json::Map<String, Value>) {
        self.merge_at(&NodePath::root(), timestamp, map);
    }

    fn merge_at(&self, base: &NodePath, timestamp: u64, map: &serde_json::Map<String, Value>) {
        for (key, value) in map {
            let child_path = base.child(key.as_str());
            match value {
                Value::Object(nested) => self.merge_at(&child_path, timestamp, nested),
                other => {
                    self.set_value(&child_path, other.clone(), timestamp, false);
                }
            }
        }
    }

    /// Register a validator for the leaf at `path` (created if absent).
    pub fn set_validator(&self, path: &NodePath, validator: ValidatorFn) {
        let mut inner = self.inner.lock();
        let id = Self::lookup_leaf_id(&mut inner, path, Value::Null);
        inner.validators.insert(id, validator);
    }

    // -- subscriptions ---------------------------------------------------

    /// Attach a subscriber to the node at `path` (created as an `Unresolved`
    /// placeholder if absent, so a later `set_value` can still write a leaf
    /// there). Containers fire for any descendant change; leaves fire only
    /// for themselves.
    pub fn subscribe(&self, path: &NodePath, cb: SubscriberFn) -> SubscriberId {
        let mut inner = self.inner.lock();
        let id = Self::ensure_node_path(&mut inner, path.segments());
        let sub_id = SubscriberId(self.next_subscriber_id.fetch_add(1, Ordering::SeqCst));
        inner.subscribers.entry(id).or_default().push((sub_id, cb));
        sub_id
    }

    /// Attach a subscriber to an existing leaf without forcing container
    /// semantics on the path (used when the caller already holds the leaf).
    pub fn subscribe_leaf(&self, path: &NodePath, default: Value, cb: SubscriberFn) -> SubscriberId {
        let mut inner = self.inner.lock();
        let id = Self::lookup_leaf_id(&mut inner, path, default);
        let sub_id = SubscriberId(self.next_subscriber_id.fetch_add(1, Ordering::SeqCst));
        inner.subscribers.entry(id).or_default().push((sub_id, cb));
        sub_id
    }

    pub fn unsubscribe(&self, path: &NodePath, id: SubscriberId) {
        let mut inner = self.inner.lock();
        if let Some(node_id) = Self::traverse(&inner, path) {
            if let Some(subs) = inner.subscribers.get_mut(&node_id) {
                subs.retain(|(sid, _)| *sid != id);
            }
        }
    }

    /// Enqueue notification delivery for a mutated node: the node's own
    /// subscribers, then every ancestor container's subscribers (since
    /// containers observe any descendant change), in that order, onto the
    /// PublishQueue for FIFO, monotonic-modtime delivery. Every subscriber in
    /// the chain — including ancestor containers — is handed the mutated
    /// node's own snapshot and path, not the ancestor's; only `WhatHappened`
    /// varies (`ChildChanged` once depth above the originating node).
    fn notify(&self, id: NodeId, what: WhatHappened) {
        let (snapshot, chain) = {
            let inner = self.inner.lock();
            let snapshot = inner.snapshot(id);
            let mut chain = Vec::new();
            let mut cursor = Some(id);
            while let Some(cur) = cursor {
                chain.push(cur);
                cursor = inner.nodes[cur].as_ref().and_then(|e| e.parent);
            }
            (snapshot, chain)
        };

        for (depth, node_id) in chain.into_iter().enumerate() {
            let what = if depth == 0 { what } else { WhatHappened::ChildChanged };
            self.dispatch(node_id, what, &snapshot);
        }
    }

    fn notify_removed(&self, path: &NodePath, timestamp: u64) {
        // The node is already gone from the arena; synthesize a snapshot
        // carrying the path and removal timestamp so subscribers still learn
        // what was removed and when. Only ancestor containers can still hold
        // subscribers here, since the removed node's own subscriber list was
        // dropped with it in `remove`.
        let snapshot = NodeSnapshot { path: path.clone(), modtime: timestamp, value: None };
        let callbacks = {
            let inner = self.inner.lock();
            let Some((parent_path, _)) = path.split_last() else { return };
            let Some(parent_id) = Self::traverse(&inner, &parent_path) else { return };
            let mut callbacks = Vec::new();
            let mut cursor = Some(parent_id);
            while let Some(cur) = cursor {
                if let Some(subs) = inner.subscribers.get(&cur) {
                    callbacks.extend(subs.iter().map(|(_, cb)| cb.clone()));
                }
                cursor = inner.nodes[cur].as_ref().and_then(|e| e.parent);
            }
            callbacks
        };
        for cb in callbacks {
            let snap = snapshot.clone();
            let p = path.clone();
            self.publish.submit(move || cb(WhatHappened::ChildRemoved, &snap, &p));
        }
    }

    /// Collect the callbacks attached to `node_id`, then enqueue each onto
    /// the publish queue with the originating node's `snapshot` — not
    /// `node_id`'s own snapshot, which for an ancestor container dispatch
    /// would wrongly report `value: None` and the container's own path.
    /// Callbacks are cloned `Arc`s so the tree's lock is released before any
    /// callback runs, letting the callback itself call back into the tree.
    fn dispatch(&self, node_id: NodeId, what: WhatHappened, snapshot: &NodeSnapshot) {
        let callbacks = {
            let inner = self.inner.lock();
            let Some(subs) = inner.subscribers.get(&node_id) else { return };
            if subs.is_empty() {
                return;
            }
            subs.iter().map(|(_, cb)| cb.clone()).collect::<Vec<_>>()
        };
        let path = snapshot.path.clone();
        for cb in callbacks {
            let snap = snapshot.clone();
            let p = path.clone();
            self.publish.submit(move || cb(what, &snap, &p));
        }
    }

    // -- POJO round-trip ---------------------------------------------------

    /// Serialize the whole tree to a `serde_json::Value` (containers become
    /// objects, list-valued leaves stay lists).
    pub fn to_pojo(&self) -> Value {
        let inner = self.inner.lock();
        Self::to_pojo_node(&inner, ROOT)
    }

    fn to_pojo_node(inner: &Inner, id: NodeId) -> Value {
        let entry = inner.nodes[id].as_ref().expect("to_pojo of removed node");
        match &entry.kind {
            NodeKind::Leaf { value } => value.clone(),
            NodeKind::Container { children } => {
                let mut map = serde_json::Map::new();
                for (name, child) in children {
                    map.insert(name.to_string(), Self::to_pojo_node(inner, *child));
                }
                Value::Object(map)
            }
            // A subscribe-only placeholder never written to; nothing to
            // serialize.
            NodeKind::Unresolved => Value::Null,
        }
    }

    /// Merge a YAML document into the tree at `timestamp`.
    pub fn merge_yaml(&self, bytes: &[u8], timestamp: u64) -> Result<(), crate::ConfigError> {
        let value: Value = serde_yaml::from_slice(bytes)?;
        self.merge_value(&value, timestamp);
        Ok(())
    }

    /// Merge a JSON document into the tree at `timestamp`.
    pub fn merge_json(&self, bytes: &[u8], timestamp: u64) -> Result<(), crate::ConfigError> {
        let value: Value = serde_json::from_slice(bytes)?;
        self.merge_value(&value, timestamp);
        Ok(())
    }

    fn merge_value(&self, value: &Value, timestamp: u64) {
        if let Value::Object(map) = value {
            self.merge_map(timestamp, map);
        }
    }

    /// Iterate over every leaf currently in the tree as `(path, value,
    /// modtime)`, in a stable order. Used by the activator's snapshot step
    /// and by tlog compaction.
    pub fn leaves(&self) -> Vec<(NodePath, Value, u64)> {
        let inner = self.inner.lock();
        let mut out = Vec::new();
        Self::collect_leaves(&inner, ROOT, &mut out);
        out
    }

    fn collect_leaves(inner: &Inner, id: NodeId, out: &mut Vec<(NodePath, Value, u64)>) {
        let entry = inner.nodes[id].as_ref().expect("collect_leaves of removed node");
        match &entry.kind {
            NodeKind::Leaf { value } => out.push((inner.path_of(id), value.clone(), entry.modtime)),
            NodeKind::Container { children } => {
                for child in children.values() {
                    Self::collect_leaves(inner, *child, out);
                }
            }
            NodeKind::Unresolved => {}
        }
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
