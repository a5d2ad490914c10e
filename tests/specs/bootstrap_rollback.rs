// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Spec §8 scenario 5: bootstrap rollback. A kernel-update deployment stages
//! `alts/new`, then its bootstrap task list fails partway through; the
//! activator must flip `current` -> `broken` and `old` -> `current` so the
//! loader resumes the previous distribution on its next launch, and the
//! returned exit code must be the restart code (`100`) regardless of the
//! failure, never a clean `0`.

use std::os::unix::fs::symlink;

use hearth_activator::{AltsLayout, BootstrapTask, KernelUpdateActivator, LoaderAction};
use tokio_util::sync::CancellationToken;

use crate::prelude::bare_deployment;

fn make_distribution(dir: &std::path::Path, name: &str) -> std::path::PathBuf {
    let dist = dir.join(name);
    std::fs::create_dir_all(dist.join("bin")).unwrap();
    std::fs::write(dist.join("bin").join("hearthd"), b"#!/bin/sh\nexit 0\n").unwrap();
    dist
}

#[tokio::test]
async fn failed_bootstrap_task_rolls_back_and_requests_restart() {
    let root = tempfile::tempdir().unwrap();
    let alts = root.path().join("alts");
    std::fs::create_dir_all(&alts).unwrap();

    let old_dist = make_distribution(root.path(), "dist-old");
    symlink(&old_dist, alts.join("current")).unwrap();

    let new_dist = make_distribution(root.path(), "dist-new");

    let deployment = bare_deployment(1, hearth_activator::Stage::Bootstrap);
    let config = hearth_config::ConfigTree::new();
    let activator = KernelUpdateActivator::new();

    let tasks = vec![BootstrapTask { command: vec!["false".to_string()], cwd: None, env: Default::default() }];
    activator.prepare(&config, &deployment, root.path(), &new_dist, &tasks).unwrap();

    assert!(alts.join("new").symlink_metadata().is_ok());

    let cancel = CancellationToken::new();
    let result = activator.run(root.path(), &deployment, 0, &cancel).await.unwrap();

    assert_eq!(result.exit_code, 100);
    assert!(result.rolled_back);

    let layout = AltsLayout::inspect(&alts);
    assert!(layout.current, "current must point back at the previous distribution");
    assert!(layout.broken, "the failed distribution is kept at broken for inspection");
    assert!(!layout.old, "old was consumed by the flip back to current");

    let current_target = std::fs::read_link(alts.join("current")).unwrap();
    assert_eq!(current_target, old_dist);

    let broken_target = std::fs::read_link(alts.join("broken")).unwrap();
    assert_eq!(broken_target, old_dist);

    assert_eq!(hearth_activator::loader_action(layout).unwrap(), LoaderAction::Launch);
}
