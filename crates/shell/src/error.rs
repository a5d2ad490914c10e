// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Error kinds for spawning and waiting on external processes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to spawn `{command}`: {source}")]
    SpawnFailed { command: String, source: std::io::Error },

    #[error("failed to wait on `{command}`: {source}")]
    WaitFailed { command: String, source: std::io::Error },
}
