// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Subscriber notification shape.

use crate::tree::NodeSnapshot;
use hearth_core::NodePath;

/// What happened to the node a subscriber is attached to (or one of its
/// descendants, if the subscriber is attached to a container).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhatHappened {
    Initialized,
    ChildAdded,
    ChildRemoved,
    ChildChanged,
    Removed,
    TimestampUpdated,
}

/// Identifies a registered subscriber for later `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub(crate) u64);

/// Callback shape: `(WhatHappened, Node, path)`.
///
/// `Arc` rather than `Box` so a callback can be cloned out from under the
/// tree's lock and invoked on the publish thread without holding it.
pub type SubscriberFn = std::sync::Arc<dyn Fn(WhatHappened, &NodeSnapshot, &NodePath) + Send + Sync>;
