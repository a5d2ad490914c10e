// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Error kinds for deployment activation (spec §7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] hearth_config::ConfigError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bootstrap task failed at line {line}: {source}")]
    BootstrapFailed { line: usize, #[source] source: hearth_shell::ShellError },

    #[error("bootstrap task at line {line} exited with unrecognized code {code}")]
    BootstrapUnrecognizedExit { line: usize, code: i32 },

    #[error("expected `{path}` to be a symlink but it is not")]
    NotASymlink { path: String },

    #[error("expected `{path}` to be absent but it exists")]
    UnexpectedlyPresent { path: String },

    #[error("configuration error: {message}")]
    Configuration { message: String },
}
