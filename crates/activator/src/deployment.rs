// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! [`Deployment`]: the declarative unit the activator applies (spec §3/§4.8).

use std::time::Duration;

use hearth_core::DeploymentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What to do when a component's version or config changes during a
/// deployment (spec §3 `packageConfigurations[]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageConfiguration {
    pub name: String,
    pub version: String,
    /// Values merged into the component's `Configuration` subtree.
    #[serde(default)]
    pub merge: Value,
    /// Paths reset to their recipe default before `merge` is applied.
    #[serde(default)]
    pub reset: Vec<String>,
}

/// What to do if a phase fails while applying this deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureHandlingPolicy {
    Rollback,
    DoNothing,
}

/// Whether already-running components are notified of a config change, and
/// how long to wait for them to settle before deciding the deployment
/// succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentUpdateAction {
    NotifyComponents,
    SkipNotify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentUpdatePolicy {
    pub action: ComponentUpdateAction,
    pub timeout_sec: u64,
}

impl ComponentUpdatePolicy {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_sec)
    }
}

/// Which step of a (possibly multi-process) activation is currently in
/// effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Default,
    KernelRollback,
    Bootstrap,
}

/// A deployment: the set of component versions and configuration deltas
/// applied atomically by the activator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub deployment_id: DeploymentId,
    pub timestamp: u64,
    pub root_components: Vec<String>,
    #[serde(default)]
    pub package_configurations: Vec<PackageConfiguration>,
    pub failure_handling_policy: FailureHandlingPolicy,
    pub component_update_policy: ComponentUpdatePolicy,
    pub stage: Stage,
}

/// Whether a deployment requires bootstrap tasks (a new runtime binary, or a
/// recipe change that cannot be applied by the currently running process).
/// In the default activator this is decided by inspecting the deployment's
/// package configurations for a `kernel` component version bump; callers
/// that already know (e.g. because the loader told them) can skip straight
/// to constructing the right activator.
pub fn requires_bootstrap(deployment: &Deployment, current_kernel_version: &str) -> bool {
    deployment
        .package_configurations
        .iter()
        .any(|pkg| pkg.name == "kernel" && pkg.version != current_kernel_version)
}

/// User-visible per-deployment outcome (spec §7), written to
/// `deployments/<id>/status.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentStatus {
    Successful,
    FailedRollbackComplete,
    FailedRollbackNotRequested,
    FailedNoStateChange,
    Rejected,
}
