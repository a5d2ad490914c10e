// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Error kinds for the dependency graph and lifecycle state machine.

use hearth_adapters::{AdapterError, Phase};
use hearth_recipes::RecipeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KernelError {
    #[error("circular dependency among components: {components:?}")]
    CircularDependency { components: Vec<String> },

    #[error("unknown component `{name}`")]
    UnknownComponent { name: String },

    #[error("{phase} timed out for `{component}`")]
    Timeout { component: String, phase: Phase },

    #[error("{phase} failed for `{component}`: {source}")]
    PhaseFailed { component: String, phase: Phase, #[source] source: AdapterError },

    #[error("`{component}` has no dependency satisfied: cannot start until {unmet:?}")]
    DependenciesUnmet { component: String, unmet: Vec<String> },

    #[error("no recipe registered for component `{name}`")]
    RecipeNotFound { name: String },

    #[error("malformed dependency in recipe `{name}`: {source}")]
    InvalidDependency { name: String, #[source] source: RecipeError },
}
