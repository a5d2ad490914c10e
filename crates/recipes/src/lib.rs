// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hearth-recipes: declarative component recipes (TOML/HCL/JSON) and
//! platform-tag resolution for platform-keyed subtrees.

pub mod error;
pub mod parser;
pub mod platform;
pub mod recipe;

pub use error::RecipeError;
pub use parser::{parse_recipe, Format};
pub use platform::{Platform, PlatformResolver};
pub use recipe::{ArtifactSpec, ComponentRecipe, Dependency, LifecycleScript, LifecycleScripts, ResourceLimits};
