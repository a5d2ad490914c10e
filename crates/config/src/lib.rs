// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hearth-config: the hierarchical, timestamped ConfigTree, its append-only
//! transaction log (TLog), and the single-threaded PublishQueue that
//! serializes subscriber notifications.

pub mod error;
pub mod publish_queue;
pub mod subscriber;
pub mod tlog;
pub mod tree;
pub mod validator;

pub use error::ConfigError;
pub use publish_queue::PublishQueue;
pub use subscriber::{SubscriberId, WhatHappened};
pub use tlog::{TLog, TLogEntry, TLogOp};
pub use tree::{ConfigTree, NodeSnapshot};
pub use validator::{Validator, ValidatorError, ValidatorFn};
