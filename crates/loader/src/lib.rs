// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `hearth-loader`: the out-of-process companion that owns the `alts/`
//! symlink-promotion decision (spec §6) and relaunches `hearthd` across
//! its own restart/reboot exit codes. `hearthd` resumes a kernel-update
//! activation from where it stopped on its own; this binary only ever
//! promotes a layout once, before the first launch of a given process
//! lifetime, and then relaunches the same `current` on every `100`.

pub mod error;
pub mod root;

use std::path::{Path, PathBuf};
use std::process::Command;

use hearth_activator::{loader_action, promote_new_demoting_current, promote_new_fresh, promote_old_fresh, AltsLayout, LoaderAction};

pub use error::LoaderError;

/// What the caller should do after one launch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// `hearthd` exited normally or was interrupted; stop looping.
    Stop { exit_code: i32 },
    /// `hearthd` asked to be relaunched (exit code `100`): re-inspect
    /// `alts/` and go again.
    Relaunch,
    /// `hearthd` asked for a reboot (exit code `101`) before relaunching.
    Reboot,
}

/// Inspect `alts_dir`, apply whatever symlink promotion the decision table
/// prescribes, and return the path `current` points at (the directory to
/// launch `bin/hearthd` from).
pub fn promote_and_resolve_current(alts_dir: impl AsRef<Path>) -> Result<PathBuf, LoaderError> {
    let alts_dir = alts_dir.as_ref();
    let layout = AltsLayout::inspect(alts_dir);
    match loader_action(layout)? {
        LoaderAction::Launch => {}
        LoaderAction::PromoteNewDemotingCurrent => promote_new_demoting_current(alts_dir)?,
        LoaderAction::PromoteNewFresh => promote_new_fresh(alts_dir)?,
        LoaderAction::PromoteOldFresh => promote_old_fresh(alts_dir)?,
    }
    Ok(alts_dir.join("current"))
}

/// Resolve the `hearthd` binary beneath a promoted `current` distribution
/// directory (`<current>/bin/hearthd`, the layout `stage_new` callers are
/// expected to populate).
pub fn hearthd_binary(current: &Path) -> Result<PathBuf, LoaderError> {
    let bin = current.join("bin").join("hearthd");
    if !bin.is_file() {
        return Err(LoaderError::MissingBinary { path: bin.display().to_string() });
    }
    Ok(bin)
}

/// Map an exit code from the process-exit contract (spec §6) to the next
/// step the loader loop should take.
pub fn next_step(exit_code: i32) -> NextStep {
    match exit_code {
        100 => NextStep::Relaunch,
        101 => NextStep::Reboot,
        other => NextStep::Stop { exit_code: other },
    }
}

/// Best-effort platform reboot request. Out of scope per spec §1 to do
/// anything more than invoke the platform's own reboot command; failures
/// are returned for the caller to log rather than panicking the loader.
pub fn request_reboot() -> Result<(), LoaderError> {
    let status = Command::new("reboot").status()?;
    if !status.success() {
        tracing::warn!(status = %status, "reboot command exited unsuccessfully");
    }
    Ok(())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
