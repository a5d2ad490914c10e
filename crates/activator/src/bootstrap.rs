// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! The bootstrap task list (spec §4.8 step 2/4): a sequence of processes
//! run once, synchronously, outside the normal lifecycle machinery, before
//! the kernel-update activator asks the process to exit.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write as _};
use std::path::{Path, PathBuf};

use hearth_shell::{ExecSpec, Outcome, ShellRunner};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::ActivationError;

/// One line of a `<bootstrap>.list` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapTask {
    pub command: Vec<String>,
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// What a single bootstrap task (or the list as a whole) asked the loader
/// to do next, mapped from its exit code by the same convention as the
/// daemon's own process-exit contract (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    NoOp,
    RequestRestart,
    RequestReboot,
}

/// Serialize `tasks` as one JSON object per line to `path`, replacing
/// whatever was there (spec §4.8 step 2: the list is written fresh for
/// every deployment, never appended to).
pub fn write_task_list(path: impl AsRef<Path>, tasks: &[BootstrapTask]) -> Result<(), ActivationError> {
    let mut file = File::create(path)?;
    for task in tasks {
        let line = serde_json::to_string(task)?;
        writeln!(file, "{line}")?;
    }
    Ok(())
}

fn read_task_list(path: impl AsRef<Path>) -> Result<Vec<BootstrapTask>, ActivationError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut tasks = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        tasks.push(serde_json::from_str(&line)?);
    }
    Ok(tasks)
}

/// Run every task in `<path>` in order starting at `from_line` (0-based),
/// stopping at the first non-`NO_OP` outcome or the first failure. Resuming
/// from an arbitrary line after a crash and re-running from there is
/// required to be idempotent (spec §4.8 invariant) — that property lives in
/// each task's own command, not in this runner.
pub async fn run_task_list(
    path: impl AsRef<Path>,
    from_line: usize,
    cancel: &CancellationToken,
) -> Result<BootstrapOutcome, ActivationError> {
    let tasks = read_task_list(path)?;
    let runner = ShellRunner::new();
    let mut outcome = BootstrapOutcome::NoOp;

    for (line, task) in tasks.iter().enumerate().skip(from_line) {
        let mut spec = ExecSpec::new(task.command.first().cloned().unwrap_or_default())
            .args(task.command.iter().skip(1).cloned());
        if let Some(cwd) = &task.cwd {
            spec = spec.cwd(cwd.clone());
        }
        for (key, value) in &task.env {
            spec = spec.env(key.clone(), value.clone());
        }

        let output = runner
            .run(&spec, cancel)
            .await
            .map_err(|source| ActivationError::BootstrapFailed { line, source })?;

        let code = match output.outcome {
            Outcome::Exited(code) => code,
            Outcome::TimedOut | Outcome::Cancelled => {
                return Err(ActivationError::BootstrapUnrecognizedExit { line, code: -1 });
            }
        };

        outcome = match code {
            0 => BootstrapOutcome::NoOp,
            100 => BootstrapOutcome::RequestRestart,
            101 => BootstrapOutcome::RequestReboot,
            other => return Err(ActivationError::BootstrapUnrecognizedExit { line, code: other }),
        };

        if outcome != BootstrapOutcome::NoOp {
            break;
        }
    }

    Ok(outcome)
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
