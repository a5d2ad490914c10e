// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Shared fixtures for the workspace-level specs.

#![allow(dead_code)]

use std::path::Path;

use hearth_activator::{ComponentUpdateAction, ComponentUpdatePolicy, Deployment, FailureHandlingPolicy, Stage};
use hearth_core::DeploymentId;

/// Write a minimal TOML recipe with the given dependency list, in the
/// `name[:requiredState]` form spec §3 defines.
pub fn write_recipe(dir: &Path, name: &str, dependencies: &[&str]) {
    std::fs::create_dir_all(dir).unwrap();
    let deps = dependencies.iter().map(|d| format!("\"{d}\"")).collect::<Vec<_>>().join(", ");
    let toml = format!("name = \"{name}\"\nversion = \"1.0.0\"\ndependencies = [{deps}]\n");
    std::fs::write(dir.join(format!("{name}.toml")), toml).unwrap();
}

/// A `Deployment` with no package configurations or root components,
/// callers fill in what the scenario needs.
pub fn bare_deployment(timestamp: u64, stage: Stage) -> Deployment {
    Deployment {
        deployment_id: DeploymentId::new(),
        timestamp,
        root_components: Vec::new(),
        package_configurations: Vec::new(),
        failure_handling_policy: FailureHandlingPolicy::Rollback,
        component_update_policy: ComponentUpdatePolicy { action: ComponentUpdateAction::NotifyComponents, timeout_sec: 30 },
        stage,
    }
}
