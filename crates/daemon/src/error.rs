// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Top-level daemon error kinds: everything a lower crate can report, plus
//! the daemon's own startup failures (lock contention, missing root).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] hearth_config::ConfigError),

    #[error("recipe error: {0}")]
    Recipe(#[from] hearth_recipes::RecipeError),

    #[error("kernel error: {0}")]
    Kernel(#[from] hearth_kernel::KernelError),

    #[error("activation error: {0}")]
    Activation(#[from] hearth_activator::ActivationError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("another hearthd instance already holds the lock at {path}")]
    AlreadyRunning { path: String },

    #[error("root directory `{path}` does not exist and could not be created")]
    RootUnavailable { path: String },
}
