// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Exclusive lock file preventing two `hearthd` instances from running
//! against the same root (SPEC_FULL §2 step 1), mirroring the reference
//! daemon's PID lock file — `fs2`'s advisory file lock rather than hand-rolled
//! `flock` FFI, the same crate the reference project uses for its own
//! daemon lock.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;

use crate::error::DaemonError;

/// Holds the open, locked file for the process's lifetime; dropping it
/// releases the lock.
pub struct LockFile {
    #[allow(dead_code)]
    file: File,
}

/// Attempt to acquire the exclusive lock at `path`, writing this process's
/// PID into it on success. Fails immediately (non-blocking) rather than
/// waiting, so a second `hearthd` against the same root exits promptly
/// instead of hanging.
pub fn acquire(path: &Path) -> Result<LockFile, DaemonError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).write(true).truncate(false).open(path)?;
    file.try_lock_exclusive().map_err(|_| DaemonError::AlreadyRunning { path: path.display().to_string() })?;
    file.set_len(0)?;
    write!(file, "{}", std::process::id())?;
    file.flush()?;
    Ok(LockFile { file })
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
