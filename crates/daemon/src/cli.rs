// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! The core-facing CLI surface (spec §6). `hearthd` is normally launched by
//! `hearth-loader`, not invoked directly by a human, so this is a small
//! `clap` derive rather than a full subcommand tree — matching the
//! reference daemon binary, which also takes no subcommands and only
//! understands a couple of informational flags plus its one real mode of
//! operation.

use std::path::PathBuf;

use clap::Parser;

/// Device-local orchestration core daemon.
#[derive(Debug, Parser)]
#[command(name = "hearthd", version, about = "Hearth orchestration core daemon")]
pub struct Cli {
    /// Working root directory (overrides `ROOT`).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Declarative config seed merged into the tree on first boot.
    #[arg(long = "init-config")]
    pub init_config: Option<PathBuf>,

    /// AWS region for the (out-of-scope) cloud control-plane client.
    /// Accepted and stored so the provisioning wrapper can read it back
    /// from the daemon's recorded config; the core does not act on it.
    #[arg(long = "aws-region")]
    pub aws_region: Option<String>,

    /// Whether to run the (out-of-scope) device provisioning flow.
    #[arg(long = "provision")]
    pub provision: Option<bool>,

    /// Whether to install the (out-of-scope) platform system service unit.
    #[arg(long = "setup-system-service")]
    pub setup_system_service: Option<bool>,

    /// Whether to drive startup of the configured components after boot.
    /// Defaults to `true`; set `false` to boot the core without starting
    /// anything, e.g. for a provisioning-only invocation.
    #[arg(long = "start")]
    pub start: Option<bool>,

    /// Default `user[:group]` external-script components run as, when a
    /// recipe does not specify one (platform process launching beyond
    /// `hearth-shell`'s plain spawn is out of scope; this is accepted and
    /// threaded into the phase environment as `HEARTH_DEFAULT_USER`).
    #[arg(long = "component-default-user")]
    pub component_default_user: Option<String>,
}

impl Cli {
    pub fn should_start(&self) -> bool {
        self.start.unwrap_or(true)
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
