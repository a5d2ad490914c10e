// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Wires every accepted [`ConfigTree`] mutation into the on-disk [`TLog`],
//! by subscribing at the tree root: containers fire for any descendant
//! change (spec §3 Subscriber semantics), so one subscription here is
//! sufficient to mirror the whole tree.

use std::sync::Arc;

use hearth_config::{ConfigTree, TLog, WhatHappened};
use hearth_core::NodePath;
use parking_lot::Mutex;

/// Subscribe `tree` to append every accepted mutation to `tlog`. The
/// subscription itself runs on the tree's publish queue, so tlog writes
/// never race the mutation that produced them and always observe
/// monotonic modtimes.
pub fn wire(tree: &Arc<ConfigTree>, tlog: Arc<Mutex<TLog>>) {
    tree.subscribe(
        &NodePath::root(),
        std::sync::Arc::new(move |what, snapshot, path| {
            let mut tlog = tlog.lock();
            let result = match what {
                WhatHappened::ChildAdded | WhatHappened::ChildChanged => {
                    tlog.append_set(snapshot.modtime, path, snapshot.value.as_ref().unwrap_or(&serde_json::Value::Null))
                }
                WhatHappened::ChildRemoved | WhatHappened::Removed => tlog.append_remove(snapshot.modtime, path),
                WhatHappened::Initialized | WhatHappened::TimestampUpdated => Ok(()),
            };
            if let Err(err) = result {
                tracing::error!(error = %err, path = %path, "failed to mirror config mutation into tlog");
            }
        }),
    );
}

#[cfg(test)]
#[path = "tlog_mirror_tests.rs"]
mod tests;
