// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! `hearthd`: the orchestration core daemon.
//!
//! Normally launched by `hearth-loader`, which owns the `alts/` symlink
//! promotion decision and restarts this binary whenever it exits with one
//! of the restart/reboot codes from spec §6's exit-code contract:
//!
//! - `0`   — normal shutdown (SIGTERM/SIGINT), nothing more to do
//! - `100` — the loader should re-inspect `alts/` and relaunch
//! - `101` — the loader should request a platform reboot before relaunching
//! - `130` — interrupted (SIGINT received directly, e.g. run in a terminal)

use std::time::Duration;

use clap::Parser;
use hearth_daemon::{boot, Cli, DaemonConfig, StartupOutcome};
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let daemon_config = DaemonConfig::load(&cli);

    if let Err(err) = daemon_config.ensure_layout() {
        eprintln!("hearthd: could not prepare root `{}`: {err}", daemon_config.root.display());
        std::process::exit(1);
    }

    let _lock = match hearth_daemon::lock::acquire(&daemon_config.lock_path()) {
        Ok(lock) => lock,
        Err(err) => {
            eprintln!("hearthd: {err}");
            std::process::exit(1);
        }
    };

    let _log_guard = match hearth_daemon::logging::setup(&daemon_config.log_path(), hearth_daemon::env::log_store()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("hearthd: failed to set up logging: {err}");
            std::process::exit(1);
        }
    };

    info!(root = %daemon_config.root.display(), "starting hearthd");

    if !daemon_config.start_on_boot {
        info!("--start=false: boot-only invocation, exiting without starting components");
        std::process::exit(0);
    }

    let outcome = match boot(daemon_config).await {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(error = %err, "startup failed");
            std::process::exit(1);
        }
    };

    let daemon = match outcome {
        StartupOutcome::Running(daemon) => daemon,
        StartupOutcome::ExitImmediately(code) => {
            info!(code, "exiting after resumed bootstrap activation");
            std::process::exit(code);
        }
    };

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(err) => {
            tracing::error!(error = %err, "failed to install SIGTERM handler");
            std::process::exit(1);
        }
    };
    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(s) => s,
        Err(err) => {
            tracing::error!(error = %err, "failed to install SIGINT handler");
            std::process::exit(1);
        }
    };

    info!("hearthd ready");

    let exit_code = tokio::select! {
        _ = sigterm.recv() => {
            info!("received SIGTERM, shutting down");
            0
        }
        _ = sigint.recv() => {
            info!("received SIGINT, shutting down");
            130
        }
    };

    let exit_code = daemon.supervisor.shutdown(SHUTDOWN_TIMEOUT, exit_code).await;
    daemon.context.shutdown();
    info!(exit_code, "hearthd stopped");
    std::process::exit(exit_code);
}
