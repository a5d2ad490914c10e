// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! The `alts/` on-disk layout and the loader's symlink-flip decision table
//! (spec §6). This module is pure data + pure functions: no I/O beyond the
//! small set of symlink helpers, so both `hearthd` (resuming after its own
//! restart) and the standalone `hearth-loader` binary can share one
//! implementation of "what does this layout mean and what do I do about it".

use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use crate::error::ActivationError;

/// Which of the four transient `alts/*` symlinks are present on disk.
/// `current` is expected to almost always be present; the other three are
/// transient markers left behind mid-deployment or mid-rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AltsLayout {
    pub current: bool,
    pub new: bool,
    pub old: bool,
    pub broken: bool,
}

impl AltsLayout {
    /// Inspect `alts_dir` (normally `<root>/alts`) and report which of the
    /// four symlinks exist. Existence is checked with `symlink_metadata` so
    /// a dangling symlink still counts as present — the loader only cares
    /// about the marker, not the target's current validity.
    pub fn inspect(alts_dir: impl AsRef<Path>) -> Self {
        let dir = alts_dir.as_ref();
        let present = |name: &str| dir.join(name).symlink_metadata().is_ok();
        AltsLayout {
            current: present("current"),
            new: present("new"),
            old: present("old"),
            broken: present("broken"),
        }
    }
}

/// What the loader should do for a given [`AltsLayout`] (spec §6's loader
/// decision table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderAction {
    /// Nothing to flip; launch whatever `current` points at.
    Launch,
    /// `new` is ready and there is an existing `current` to retire: flip
    /// `current` -> `old`, then `new` -> `current`, then launch.
    PromoteNewDemotingCurrent,
    /// `new` is ready and there is no existing `current` (first boot):
    /// flip `new` -> `current`, then launch.
    PromoteNewFresh,
    /// A prior rollback left `old` as the only survivor: atomically rename
    /// it to `current`, then launch.
    PromoteOldFresh,
}

/// Map an observed layout to the action the loader table prescribes.
/// Combinations outside the six rows spec.md §6 enumerates (e.g. `new` and
/// `old` both present with no `current`) are not reachable if the activator
/// invariant holds and are rejected as a configuration error rather than
/// guessed at.
pub fn loader_action(layout: AltsLayout) -> Result<LoaderAction, ActivationError> {
    use LoaderAction::*;
    match (layout.current, layout.new, layout.old, layout.broken) {
        (true, false, false, false) => Ok(Launch),
        (true, true, false, false) => Ok(PromoteNewDemotingCurrent),
        (true, false, true, false) => Ok(Launch),
        (true, false, false, true) => Ok(Launch),
        (false, false, true, false) => Ok(PromoteOldFresh),
        (false, true, false, false) => Ok(PromoteNewFresh),
        other => Err(ActivationError::Configuration {
            message: format!(
                "alts layout current={} new={} old={} broken={} matches no loader decision table row",
                other.0, other.1, other.2, other.3
            ),
        }),
    }
}

fn remove_link(path: &Path) -> Result<(), ActivationError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// Apply [`LoaderAction::PromoteNewDemotingCurrent`]: `current` -> `old`,
/// `new` -> `current`. Both flips are symlink renames (`current`/`old`
/// themselves stay symlinks pointing at the same target they did before),
/// so a crash between the two leaves the state machine able to resume: the
/// (`current`,`old`) or (`old`,`new`-still-present) layout both still
/// appear in the decision table.
pub fn promote_new_demoting_current(alts_dir: impl AsRef<Path>) -> Result<(), ActivationError> {
    let dir = alts_dir.as_ref();
    let current = dir.join("current");
    let new = dir.join("new");
    let old = dir.join("old");
    let target = fs::read_link(&current)?;
    remove_link(&old)?;
    symlink(&target, &old)?;
    remove_link(&current)?;
    let new_target = fs::read_link(&new)?;
    symlink(&new_target, &current)?;
    remove_link(&new)?;
    Ok(())
}

/// Apply [`LoaderAction::PromoteNewFresh`]: `new` -> `current`, no existing
/// `current` to retire.
pub fn promote_new_fresh(alts_dir: impl AsRef<Path>) -> Result<(), ActivationError> {
    let dir = alts_dir.as_ref();
    let new = dir.join("new");
    let current = dir.join("current");
    let target = fs::read_link(&new)?;
    symlink(&target, &current)?;
    remove_link(&new)?;
    Ok(())
}

/// Apply [`LoaderAction::PromoteOldFresh`]: atomically rename `old` to
/// `current` (a single `rename(2)`, so it cannot be observed half-done).
pub fn promote_old_fresh(alts_dir: impl AsRef<Path>) -> Result<(), ActivationError> {
    let dir = alts_dir.as_ref();
    fs::rename(dir.join("old"), dir.join("current"))?;
    Ok(())
}

/// Bootstrap-failure rollback step (spec §4.8 step 4): `current` ->
/// `broken`, `old` -> `current`, leaving `alts/new` behind as evidence of
/// the failed distribution.
pub fn flip_current_to_broken_and_old_to_current(alts_dir: impl AsRef<Path>) -> Result<(), ActivationError> {
    let dir = alts_dir.as_ref();
    let current = dir.join("current");
    let old = dir.join("old");
    let broken = dir.join("broken");
    let current_target = fs::read_link(&current)?;
    remove_link(&broken)?;
    symlink(&current_target, &broken)?;
    remove_link(&current)?;
    let old_target = fs::read_link(&old)?;
    symlink(&old_target, &current)?;
    remove_link(&old)?;
    Ok(())
}

/// Stage a new distribution at `alts/new`, asserting the preconditions
/// spec §4.8 step 3 requires: `new` must not already exist, `old` must not
/// already exist, and `current` must already be a symlink.
pub fn stage_new(alts_dir: impl AsRef<Path>, distribution: impl AsRef<Path>) -> Result<PathBuf, ActivationError> {
    let dir = alts_dir.as_ref();
    let current = dir.join("current");
    let new = dir.join("new");
    let old = dir.join("old");

    if new.symlink_metadata().is_ok() {
        return Err(ActivationError::UnexpectedlyPresent { path: new.display().to_string() });
    }
    if old.symlink_metadata().is_ok() {
        return Err(ActivationError::UnexpectedlyPresent { path: old.display().to_string() });
    }
    let meta = current
        .symlink_metadata()
        .map_err(|_| ActivationError::NotASymlink { path: current.display().to_string() })?;
    if !meta.file_type().is_symlink() {
        return Err(ActivationError::NotASymlink { path: current.display().to_string() });
    }

    symlink(distribution.as_ref(), &new)?;
    Ok(new)
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
