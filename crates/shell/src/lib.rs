// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hearth-shell: spawn external processes with env, cwd, and a timeout,
//! capturing stdout/stderr. Used by lifecycle phases, external-script
//! services, and the deployment activator's bootstrap tasks.

pub mod error;
pub mod exec;

pub use error::ShellError;
pub use exec::{ExecOutput, ExecSpec, Outcome, ShellRunner};
