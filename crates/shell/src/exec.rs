// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! [`ShellRunner`]: spawn external processes with env, cwd, and a timeout,
//! capturing stdout/stderr.
//!
//! Every lifecycle phase and bootstrap task in `hearth-kernel`/`hearth-activator`
//! goes through here rather than calling `tokio::process::Command` directly,
//! so cancellation (a state-machine transition racing ahead, or a phase
//! timeout firing) always reaches the child process as a real kill rather
//! than merely dropping a future.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::error::ShellError;

/// Declarative description of one process to spawn.
#[derive(Debug, Clone, Default)]
pub struct ExecSpec {
    pub command: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: HashMap<String, String>,
    pub timeout: Option<Duration>,
}

impl ExecSpec {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), ..Default::default() }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// How a completed (or terminated) process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Exited normally, with this exit code.
    Exited(i32),
    /// Killed after the per-phase timeout fired.
    TimedOut,
    /// Killed because the caller's cancellation token fired first.
    Cancelled,
}

/// Captured result of running an [`ExecSpec`] to completion.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub outcome: Outcome,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub duration: Duration,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        matches!(self.outcome, Outcome::Exited(0))
    }

    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Spawns external processes on the worker pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }

    /// Run `spec` to completion (or until its timeout fires, or `cancel` is
    /// triggered), capturing stdout/stderr.
    pub async fn run(&self, spec: &ExecSpec, cancel: &CancellationToken) -> Result<ExecOutput, ShellError> {
        let start = Instant::now();
        let span = tracing::info_span!("shell.exec", command = %spec.command, args = ?spec.args);
        let _enter = span.enter();

        let mut command = Command::new(&spec.command);
        command.args(&spec.args);
        command.envs(&spec.env);
        if let Some(cwd) = &spec.cwd {
            command.current_dir(cwd);
        }
        command.stdout(std::process::Stdio::piped());
        command.stderr(std::process::Stdio::piped());
        command.kill_on_drop(true);

        let mut child = command
            .spawn()
            .map_err(|source| ShellError::SpawnFailed { command: spec.command.clone(), source })?;

        let mut stdout_pipe = child.stdout.take();
        let mut stderr_pipe = child.stderr.take();
        let stdout_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(pipe) = stdout_pipe.as_mut() {
                let _ = pipe.read_to_end(&mut buf).await;
            }
            buf
        });
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(pipe) = stderr_pipe.as_mut() {
                let _ = pipe.read_to_end(&mut buf).await;
            }
            buf
        });

        let sleep = match spec.timeout {
            Some(d) => tokio::time::sleep(d),
            None => tokio::time::sleep(Duration::from_secs(u64::MAX / 2)),
        };
        tokio::pin!(sleep);

        let outcome = tokio::select! {
            status = child.wait() => {
                let status = status.map_err(|source| ShellError::WaitFailed { command: spec.command.clone(), source })?;
                Outcome::Exited(status.code().unwrap_or(-1))
            }
            () = &mut sleep => {
                kill_and_wait(&mut child).await;
                Outcome::TimedOut
            }
            () = cancel.cancelled() => {
                kill_and_wait(&mut child).await;
                Outcome::Cancelled
            }
        };

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();
        let duration = start.elapsed();

        if matches!(outcome, Outcome::TimedOut) {
            tracing::warn!(timeout_ms = spec.timeout.map(|d| d.as_millis()).unwrap_or_default() as u64, "process timed out");
        }

        Ok(ExecOutput { outcome, stdout, stderr, duration })
    }
}

async fn kill_and_wait(child: &mut tokio::process::Child) {
    let _ = child.start_kill();
    let _ = child.wait().await;
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
