// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! [`DaemonConfig`]: the daemon's resolved root directory and the
//! filesystem layout beneath it (spec §6), with CLI flags taking
//! precedence over environment variables taking precedence over built-in
//! defaults — the same layered-config shape the reference daemon's
//! `Config::load` uses for its state directory resolution.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::env;

/// Resolved paths under the working root (spec §6 filesystem layout).
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub root: PathBuf,
    pub init_config: Option<PathBuf>,
    pub component_default_user: Option<String>,
    pub start_on_boot: bool,
}

impl DaemonConfig {
    /// Resolve from parsed CLI flags, falling back to environment
    /// variables and then a platform default for anything the CLI left
    /// unset.
    pub fn load(cli: &Cli) -> Self {
        let root = cli.root.clone().or_else(env::root_from_env).unwrap_or_else(env::default_root);
        Self {
            root,
            init_config: cli.init_config.clone(),
            component_default_user: cli.component_default_user.clone(),
            start_on_boot: cli.should_start(),
        }
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    pub fn tlog_path(&self) -> PathBuf {
        self.config_dir().join("config.tlog")
    }

    pub fn yaml_seed_path(&self) -> PathBuf {
        self.config_dir().join("config.yaml")
    }

    pub fn work_dir(&self) -> PathBuf {
        self.root.join("work")
    }

    pub fn recipes_dir(&self) -> PathBuf {
        self.root.join("packages").join("recipes")
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.root.join("packages").join("artifacts")
    }

    pub fn deployments_dir(&self) -> PathBuf {
        self.root.join("deployments")
    }

    pub fn alts_dir(&self) -> PathBuf {
        self.root.join("alts")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join("hearthd.lock")
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join("hearthd.log")
    }

    /// Create every directory this layout needs, if absent.
    pub fn ensure_layout(&self) -> std::io::Result<()> {
        for dir in [
            self.config_dir(),
            self.work_dir(),
            self.recipes_dir(),
            self.artifacts_dir(),
            self.deployments_dir(),
        ] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

/// True if `path`'s modification time is newer than `since_ms` (epoch
/// milliseconds). Used to decide whether a `config.yaml` seed should be
/// merged ahead of tlog replay on a given boot — mirrors the modtime-gated
/// merge rule applied everywhere else in the config store (spec §4.1).
pub fn is_newer_than(path: &Path, since_ms: u64) -> bool {
    let Ok(meta) = std::fs::metadata(path) else { return false };
    let Ok(modified) = meta.modified() else { return false };
    let Ok(duration) = modified.duration_since(std::time::UNIX_EPOCH) else { return false };
    duration.as_millis() as u64 > since_ms
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
