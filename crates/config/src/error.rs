// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Error kinds for the configuration store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("corrupt tlog entry at line {line}: {message}")]
    CorruptEntry { line: usize, message: String },

    #[error("expected a leaf at {path}, found a container")]
    NotALeaf { path: String },

    #[error("expected a container at {path}, found a leaf")]
    NotAContainer { path: String },
}
