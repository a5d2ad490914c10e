// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! [`ComponentRecipe`]: the declarative form of a service.

use hearth_core::RequiredState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::RecipeError;

/// One `name[:requiredState]` dependency entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    #[serde(default)]
    pub required_state: DependencyState,
}

/// Wire form of [`RequiredState`] (serde needs a type with a `Default` that
/// mirrors the spec's "default RUNNING" rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyState(pub RequiredState);

impl Default for DependencyState {
    fn default() -> Self {
        DependencyState(RequiredState::default())
    }
}

impl Dependency {
    /// Parse a `name[:requiredState]` spec, e.g. `"A:RUNNING"` or plain `"A"`.
    pub fn parse(spec: &str, owner: &str) -> Result<Self, RecipeError> {
        match spec.split_once(':') {
            Some((name, state)) => {
                let state = parse_required_state(state).ok_or_else(|| RecipeError::MalformedDependency {
                    name: owner.to_string(),
                    spec: spec.to_string(),
                })?;
                Ok(Dependency { name: name.to_string(), required_state: DependencyState(state) })
            }
            None => {
                if spec.is_empty() {
                    return Err(RecipeError::MalformedDependency {
                        name: owner.to_string(),
                        spec: spec.to_string(),
                    });
                }
                Ok(Dependency { name: spec.to_string(), required_state: DependencyState::default() })
            }
        }
    }
}

fn parse_required_state(s: &str) -> Option<RequiredState> {
    use hearth_core::State;
    let state = match s.to_ascii_uppercase().as_str() {
        "NEW" => State::New,
        "INSTALLED" => State::Installed,
        "STARTING" => State::Starting,
        "RUNNING" => State::Running,
        "STOPPING" => State::Stopping,
        "FINISHED" => State::Finished,
        _ => return None,
    };
    Some(RequiredState(state))
}

/// An artifact the recipe's `install` phase expects staged on disk before it
/// runs. Download/unarchival is an external collaborator (out of scope);
/// this is purely the declarative field the parser accepts and the
/// Lifecycle passes through to the phase environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSpec {
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub unarchive: UnarchiveMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnarchiveMode {
    #[default]
    None,
    Zip,
    Tar,
}

/// One lifecycle phase's script plus its timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleScript {
    pub script: String,
    #[serde(default = "default_phase_timeout", with = "humantime_secs")]
    pub timeout: Duration,
}

fn default_phase_timeout() -> Duration {
    Duration::from_secs(120)
}

/// Optional per-phase scripts named in spec §3: `install`, `startup`, `run`,
/// `shutdown`, `recover`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleScripts {
    #[serde(default)]
    pub install: Option<LifecycleScript>,
    #[serde(default)]
    pub startup: Option<LifecycleScript>,
    #[serde(default)]
    pub run: Option<LifecycleScript>,
    #[serde(default)]
    pub shutdown: Option<LifecycleScript>,
    #[serde(default)]
    pub recover: Option<LifecycleScript>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    #[serde(default)]
    pub memory_bytes: Option<u64>,
    #[serde(default)]
    pub cpu_shares: Option<u32>,
}

/// Declarative form of a service, as parsed from `packages/recipes/*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRecipe {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub lifecycle: LifecycleScripts,
    #[serde(default)]
    pub resource_limits: ResourceLimits,
    #[serde(default)]
    pub artifacts: Vec<ArtifactSpec>,
    /// Platform-keyed subtrees (e.g. `linux`, `darwin`), each overriding
    /// fields of this recipe when selected by [`crate::PlatformResolver`].
    #[serde(default)]
    pub platforms: IndexMap<String, PlatformOverride>,
}

/// Fields a platform-keyed subtree may override. Anything left `None`
/// inherits from the base recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformOverride {
    #[serde(default)]
    pub lifecycle: Option<LifecycleScripts>,
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
}

impl ComponentRecipe {
    /// Parsed [`Dependency`] list, resolving each `name[:requiredState]`
    /// entry. Errors point at the recipe's own name for diagnostics.
    pub fn dependencies(&self) -> Result<Vec<Dependency>, RecipeError> {
        self.dependencies.iter().map(|spec| Dependency::parse(spec, &self.name)).collect()
    }

    /// Apply a platform override selected by tag, producing the effective
    /// recipe used to drive the Lifecycle state machine.
    pub fn resolved_for(&self, tag: &str) -> ComponentRecipe {
        let Some(over) = self.platforms.get(tag) else { return self.clone() };
        let mut resolved = self.clone();
        if let Some(lifecycle) = &over.lifecycle {
            resolved.lifecycle = lifecycle.clone();
        }
        if let Some(deps) = &over.dependencies {
            resolved.dependencies = deps.clone();
        }
        resolved
    }
}

mod humantime_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
#[path = "recipe_tests.rs"]
mod tests;
