// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Per-deployment status reporting (spec §7, SPEC_FULL §6.1 addition):
//! a single JSON line written under `deployments/<id>/status.json` and
//! logged, for a future IPC server to pick up. No transport is implemented
//! here.

use std::fs;
use std::path::Path;

use hearth_core::DeploymentId;
use serde::{Deserialize, Serialize};

use crate::deployment::DeploymentStatus;
use crate::error::ActivationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub deployment_id: DeploymentId,
    pub status: DeploymentStatus,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Write `report` to `<root>/deployments/<id>/status.json`, creating the
/// per-deployment directory if needed, and emit the same outcome through
/// `tracing`.
pub fn publish(root: impl AsRef<Path>, report: &StatusReport) -> Result<(), ActivationError> {
    let dir = root.as_ref().join("deployments").join(report.deployment_id.to_string());
    fs::create_dir_all(&dir)?;
    let path = dir.join("status.json");
    let line = serde_json::to_string(report)?;
    fs::write(&path, line)?;

    match report.status {
        DeploymentStatus::Successful => {
            tracing::info!(deployment = %report.deployment_id, "deployment succeeded")
        }
        DeploymentStatus::Rejected => {
            tracing::warn!(deployment = %report.deployment_id, detail = ?report.detail, "deployment rejected")
        }
        _ => {
            tracing::error!(deployment = %report.deployment_id, status = ?report.status, detail = ?report.detail, "deployment failed")
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
