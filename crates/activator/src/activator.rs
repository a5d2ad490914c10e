// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! The two deployment strategies (spec §4.8): [`DefaultActivator`] swaps
//! configuration under the publish lock and leaves service restart to the
//! caller's normal state-machine drive; [`KernelUpdateActivator`] stages a
//! new distribution on disk and hands off to bootstrap tasks plus a
//! process exit, for changes the running process cannot apply to itself.

use std::fs;
use std::path::{Path, PathBuf};

use hearth_config::{ConfigTree, TLog};
use hearth_core::NodePath;
use tokio_util::sync::CancellationToken;

use crate::bootstrap::{self, BootstrapOutcome, BootstrapTask};
use crate::deployment::{Deployment, DeploymentStatus, FailureHandlingPolicy};
use crate::error::ActivationError;
use crate::layout;

fn deployment_dir(root: impl AsRef<Path>, deployment: &Deployment) -> PathBuf {
    root.as_ref().join("deployments").join(deployment.deployment_id.to_string())
}

/// Applies a deployment in-place: no bootstrap, no process restart. Used
/// when nothing in `deployment.package_configurations` touches the kernel
/// binary itself.
#[derive(Debug, Default)]
pub struct DefaultActivator;

impl DefaultActivator {
    pub fn new() -> Self {
        Self
    }

    /// Snapshot the current tree, then merge every package configuration's
    /// values into `services/<name>/config`, each path reset first if the
    /// configuration asks for it. Returns the snapshot path so the caller
    /// can roll back on a later phase failure.
    pub fn apply(
        &self,
        config: &ConfigTree,
        deployment: &Deployment,
        root: impl AsRef<Path>,
    ) -> Result<PathBuf, ActivationError> {
        let dir = deployment_dir(&root, deployment);
        fs::create_dir_all(&dir)?;
        let snapshot_path = dir.join("pre.tlog");
        TLog::dump_tlog(&snapshot_path, config)?;

        for pkg in &deployment.package_configurations {
            let base = NodePath::new(["services", pkg.name.as_str(), "config"]);
            for reset in &pkg.reset {
                let path = base.child(reset.as_str());
                config.remove(&path, deployment.timestamp);
            }
            if let serde_json::Value::Object(map) = &pkg.merge {
                let mut prefixed = serde_json::Map::new();
                prefixed.insert("services".to_string(), serde_json::json!({ pkg.name.clone(): { "config": map } }));
                config.merge_map(deployment.timestamp, &prefixed);
            }
        }

        Ok(snapshot_path)
    }

    /// Restore the pre-deployment snapshot by replaying it over the current
    /// tree with `force_timestamp=true`, so the snapshot's older
    /// timestamps win over whatever the partially-applied deployment wrote.
    pub fn rollback(&self, config: &ConfigTree, snapshot_path: impl AsRef<Path>) -> Result<usize, ActivationError> {
        TLog::merge_tlog_into_config(snapshot_path, config, true, None).map_err(Into::into)
    }

    /// Decide the final status for an activation attempt: `caller_failed`
    /// reflects whatever drove component restarts back through the state
    /// machine after [`Self::apply`] (that drive itself is the daemon's
    /// responsibility, not the activator's).
    pub fn resolve_outcome(&self, deployment: &Deployment, caller_failed: bool) -> DeploymentStatus {
        if !caller_failed {
            return DeploymentStatus::Successful;
        }
        match deployment.failure_handling_policy {
            FailureHandlingPolicy::Rollback => DeploymentStatus::FailedRollbackComplete,
            FailureHandlingPolicy::DoNothing => DeploymentStatus::FailedRollbackNotRequested,
        }
    }
}

/// Result of driving a [`KernelUpdateActivator`] through to the point where
/// the process must exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelUpdateResult {
    pub exit_code: i32,
    pub rolled_back: bool,
}

/// Stages a new distribution, runs its bootstrap tasks, and reports the
/// exit code the caller's `main` should exit with (spec §4.8 steps 1-5).
#[derive(Debug, Default)]
pub struct KernelUpdateActivator;

impl KernelUpdateActivator {
    pub fn new() -> Self {
        Self
    }

    /// Steps 1-3: snapshot the tree, write the bootstrap task list, and
    /// stage `distribution` at `alts/new`.
    pub fn prepare(
        &self,
        config: &ConfigTree,
        deployment: &Deployment,
        root: impl AsRef<Path>,
        distribution: impl AsRef<Path>,
        tasks: &[BootstrapTask],
    ) -> Result<(), ActivationError> {
        let root = root.as_ref();
        let dir = deployment_dir(root, deployment);
        fs::create_dir_all(&dir)?;
        TLog::dump_tlog(dir.join("target.tlog"), config)?;
        bootstrap::write_task_list(dir.join("bootstrap.list"), tasks)?;
        layout::stage_new(root.join("alts"), distribution)?;
        Ok(())
    }

    /// Step 4-5: execute the bootstrap task list starting at `from_line`.
    /// On failure, flip `alts/current` to `alts/broken` and `alts/old` to
    /// `alts/current`, and always request a restart so the loader can
    /// recover. On success, map the last task's outcome to the process
    /// exit code contract (spec §6).
    pub async fn run(
        &self,
        root: impl AsRef<Path>,
        deployment: &Deployment,
        from_line: usize,
        cancel: &CancellationToken,
    ) -> Result<KernelUpdateResult, ActivationError> {
        let root = root.as_ref();
        let dir = deployment_dir(root, deployment);
        let list_path = dir.join("bootstrap.list");

        match bootstrap::run_task_list(&list_path, from_line, cancel).await {
            Ok(outcome) => Ok(KernelUpdateResult { exit_code: exit_code_for(outcome), rolled_back: false }),
            Err(err) => {
                layout::flip_current_to_broken_and_old_to_current(root.join("alts"))?;
                tracing::error!(error = %err, deployment = %deployment.deployment_id, "bootstrap task failed, rolled back to previous distribution");
                Ok(KernelUpdateResult { exit_code: 100, rolled_back: true })
            }
        }
    }
}

fn exit_code_for(outcome: BootstrapOutcome) -> i32 {
    match outcome {
        BootstrapOutcome::NoOp | BootstrapOutcome::RequestRestart => 100,
        BootstrapOutcome::RequestReboot => 101,
    }
}

#[cfg(test)]
#[path = "activator_tests.rs"]
mod tests;
