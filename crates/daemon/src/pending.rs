// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Bootstrap/rollback resume marker (SPEC_FULL §2 step 6): a kernel-update
//! activation that reaches [`hearth_activator::KernelUpdateActivator::run`]
//! exits the process once its bootstrap task list asks for a restart or
//! reboot (spec §4.8 step 5). This module persists which line of which
//! deployment's task list was reached, so the next `hearthd` start can pick
//! the bootstrap list back up instead of re-running it from the top.

use std::fs;
use std::path::{Path, PathBuf};

use hearth_activator::Deployment;
use serde::{Deserialize, Serialize};

use crate::error::DaemonError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingActivation {
    pub deployment: Deployment,
    pub from_line: usize,
}

fn marker_path(deployments_dir: &Path, deployment_id: &str) -> PathBuf {
    deployments_dir.join(deployment_id).join("pending.json")
}

/// Record that `deployment`'s bootstrap list has been started, so a restart
/// before it completes resumes at `from_line` rather than from the top.
pub fn record(deployments_dir: &Path, deployment: &Deployment, from_line: usize) -> Result<(), DaemonError> {
    let path = marker_path(deployments_dir, &deployment.deployment_id.to_string());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let pending = PendingActivation { deployment: deployment.clone(), from_line };
    fs::write(&path, serde_json::to_vec(&pending)?)?;
    Ok(())
}

/// Remove the resume marker once a bootstrap run completes (successfully or
/// by exhausting its task list without requesting another restart).
pub fn clear(deployments_dir: &Path, deployment_id: &str) -> Result<(), DaemonError> {
    let path = marker_path(deployments_dir, deployment_id);
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// Scan `deployments_dir` for a pending marker. At most one kernel-update
/// activation is ever in flight at a time (the activator serializes
/// deployments), so the first marker found is the answer.
pub fn find(deployments_dir: &Path) -> Result<Option<PendingActivation>, DaemonError> {
    let Ok(entries) = fs::read_dir(deployments_dir) else { return Ok(None) };
    for entry in entries {
        let entry = entry?;
        let path = entry.path().join("pending.json");
        if path.is_file() {
            let bytes = fs::read(&path)?;
            return Ok(Some(serde_json::from_slice(&bytes)?));
        }
    }
    Ok(None)
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
