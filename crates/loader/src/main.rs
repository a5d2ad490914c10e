// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! `hearth-loader`: launches `hearthd` and keeps it running across the
//! restart/reboot legs of the process-exit contract (spec §6), promoting
//! the `alts/` symlink layout once per process lifetime before the first
//! launch.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{anyhow, Context as _, Result};
use clap::Parser;
use hearth_loader::{hearthd_binary, next_step, promote_and_resolve_current, request_reboot, root, NextStep};
use tracing::info;

/// Out-of-process companion that owns `alts/` symlink promotion.
#[derive(Parser)]
#[command(name = "hearth-loader", version, about = "Hearth orchestration core loader")]
struct Args {
    /// Working root directory (overrides `ROOT`); same resolution as `hearthd`.
    #[arg(long)]
    root: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let root = root::resolve(args.root);
    let alts_dir = root.join("alts");

    let current = promote_and_resolve_current(&alts_dir)
        .with_context(|| format!("resolving alts layout under {}", alts_dir.display()))?;

    let mut first_launch = true;
    loop {
        let current = if first_launch {
            first_launch = false;
            current.clone()
        } else {
            promote_and_resolve_current(&alts_dir)
                .with_context(|| format!("re-resolving alts layout under {}", alts_dir.display()))?
        };

        let bin = hearthd_binary(&current)?;
        info!(binary = %bin.display(), "launching hearthd");

        let status = Command::new(&bin)
            .arg("--root")
            .arg(&root)
            .status()
            .with_context(|| format!("spawning {}", bin.display()))?;

        let exit_code = status.code().ok_or_else(|| anyhow!("hearthd terminated by signal: {status}"))?;
        match next_step(exit_code) {
            NextStep::Stop { exit_code } => {
                info!(exit_code, "hearthd stopped, not relaunching");
                std::process::exit(exit_code);
            }
            NextStep::Relaunch => {
                info!("hearthd requested restart");
                continue;
            }
            NextStep::Reboot => {
                info!("hearthd requested reboot");
                request_reboot()?;
                std::process::exit(101);
            }
        }
    }
}
