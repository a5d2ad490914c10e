// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

use super::*;
use tempfile::tempdir;

#[test]
fn publish_writes_status_json_under_deployment_dir() {
    let dir = tempdir().unwrap();
    let id = DeploymentId::new();
    let report = StatusReport { deployment_id: id, status: DeploymentStatus::Successful, detail: None };

    publish(dir.path(), &report).unwrap();

    let path = dir.path().join("deployments").join(id.to_string()).join("status.json");
    let contents = fs::read_to_string(&path).unwrap();
    let parsed: StatusReport = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed.status, DeploymentStatus::Successful);
    assert_eq!(parsed.deployment_id, id);
}

#[test]
fn publish_overwrites_a_previous_report_for_the_same_deployment() {
    let dir = tempdir().unwrap();
    let id = DeploymentId::new();
    publish(dir.path(), &StatusReport { deployment_id: id, status: DeploymentStatus::Rejected, detail: None }).unwrap();
    publish(
        dir.path(),
        &StatusReport { deployment_id: id, status: DeploymentStatus::Successful, detail: Some("retried".into()) },
    )
    .unwrap();

    let path = dir.path().join("deployments").join(id.to_string()).join("status.json");
    let parsed: StatusReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed.status, DeploymentStatus::Successful);
    assert_eq!(parsed.detail.as_deref(), Some("retried"));
}
