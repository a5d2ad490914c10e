// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Per-component lifecycle state machine: install/startup/run/shutdown
//! phases, timeouts, `stateGeneration`-gated completions, and backoff on
//! repeated failure.

use std::sync::Arc;
use std::time::Duration;

use hearth_adapters::{AdapterError, Phase, PhaseContext, PhaseOutcome, ServiceAdapter};
use hearth_core::{Backoff, Clock, State};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::error::KernelError;

/// Tunables for the failure-escalation and backoff policy (spec §4.5).
#[derive(Debug, Clone, Copy)]
pub struct LifecycleConfig {
    /// Sliding window over which consecutive failures are counted.
    pub failure_window: Duration,
    /// Failures within `failure_window` that escalate ERRORED to BROKEN.
    pub failure_threshold: u32,
    /// How long a service must hold RUNNING before backoff resets.
    pub stable_window: Duration,
    pub backoff_base: Duration,
    pub backoff_ceiling: Duration,
    /// Grace period after a phase's own timeout before forced termination.
    pub shutdown_grace: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            failure_window: Duration::from_secs(3600),
            failure_threshold: 3,
            stable_window: Duration::from_secs(60),
            backoff_base: Duration::from_millis(500),
            backoff_ceiling: Duration::from_secs(60),
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

struct Inner<C: Clock> {
    current: State,
    generation: u64,
    backoff: Backoff,
    last_error: Option<String>,
    failure_times: Vec<std::time::Instant>,
    cancel: CancellationToken,
    running_since: Option<std::time::Instant>,
    clock: C,
}

/// Drives one component's state machine. Cheap to clone (an `Arc` inside).
pub struct Lifecycle<C: Clock = hearth_core::SystemClock> {
    name: String,
    adapter: Arc<dyn ServiceAdapter>,
    config: LifecycleConfig,
    inner: Mutex<Inner<C>>,
}

impl<C: Clock> Lifecycle<C> {
    pub fn new(name: impl Into<String>, adapter: Arc<dyn ServiceAdapter>, clock: C, config: LifecycleConfig) -> Self {
        let backoff = Backoff::new(config.backoff_base, config.backoff_ceiling);
        Self {
            name: name.into(),
            adapter,
            config,
            inner: Mutex::new(Inner {
                current: State::New,
                generation: 0,
                backoff,
                last_error: None,
                failure_times: Vec::new(),
                cancel: CancellationToken::new(),
                running_since: None,
                clock,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> State {
        self.inner.lock().current
    }

    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.lock().last_error.clone()
    }

    pub fn backoff_delay(&self) -> Duration {
        self.inner.lock().backoff.current()
    }

    /// Cancels any in-flight backing task and returns a fresh cancellation
    /// token plus the bumped generation new phase work should be tagged
    /// with; a completion that later observes a stale generation is
    /// discarded (spec §4.5 step 5).
    fn begin_transition(&self, entering: State) -> (CancellationToken, u64) {
        let mut inner = self.inner.lock();
        inner.cancel.cancel();
        inner.generation += 1;
        let token = CancellationToken::new();
        inner.cancel = token.clone();
        inner.current = entering;
        (token, inner.generation)
    }

    fn commit_if_current(&self, generation: u64, new_state: State) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            return false;
        }
        inner.current = new_state;
        if new_state == State::Running {
            inner.running_since = Some(inner.clock.now());
        }
        true
    }

    /// Run `phase`, entering `transitional` immediately and `success` if the
    /// phase succeeds and the generation is still current. A stale
    /// completion (generation raced ahead by a reconfigure) is silently
    /// discarded per the generation-freshness property.
    pub async fn run_phase(
        &self,
        ctx: &PhaseContext,
        phase: Phase,
        timeout: Duration,
        transitional: State,
        success: State,
    ) -> Result<bool, KernelError> {
        let (token, generation) = self.begin_transition(transitional);
        let span = tracing::info_span!("lifecycle_phase", component = %self.name, %phase, generation);
        let _enter = span.enter();

        let outcome = tokio::time::timeout(timeout, self.adapter.run_phase(phase, ctx, token.clone())).await;
        match outcome {
            Ok(Ok(PhaseOutcome::Succeeded)) => Ok(self.commit_if_current(generation, success)),
            Ok(Ok(PhaseOutcome::TimedOut)) => {
                self.handle_error(generation, format!("timeout in {phase}"));
                Err(KernelError::Timeout { component: self.name.clone(), phase })
            }
            Ok(Err(err)) => {
                let message = err.to_string();
                self.handle_error(generation, message);
                Err(KernelError::PhaseFailed { component: self.name.clone(), phase, source: err })
            }
            Err(_elapsed) => {
                token.cancel();
                self.handle_error(generation, format!("timeout in {phase}"));
                Err(KernelError::Timeout { component: self.name.clone(), phase })
            }
        }
    }

    /// ERRORED → (INSTALLED | BROKEN) per the sliding failure window. Returns
    /// the state actually applied, or the current state unchanged if the
    /// generation the caller observed the failure under is already stale.
    fn handle_error(&self, generation: u64, reason: String) -> State {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            return inner.current;
        }
        inner.last_error = Some(reason);
        let now = inner.clock.now();
        let window = self.config.failure_window;
        inner.failure_times.retain(|&t| now.saturating_duration_since(t) <= window);
        inner.failure_times.push(now);
        let escalate = inner.failure_times.len() as u32 >= self.config.failure_threshold;
        inner.current = if escalate { State::Broken } else { State::Errored };
        inner.backoff.next();
        inner.current
    }

    /// Resets backoff once RUNNING has held for `stable_window`; the caller
    /// (Supervisor) polls this periodically rather than the Lifecycle
    /// scheduling its own timer.
    pub fn maybe_reset_backoff(&self) {
        let mut inner = self.inner.lock();
        if inner.current != State::Running {
            return;
        }
        let Some(since) = inner.running_since else { return };
        if inner.clock.now().saturating_duration_since(since) >= self.config.stable_window {
            inner.backoff.reset();
        }
    }

    /// `INSTALLED` → `STARTING` without running the startup phase: parks a
    /// component whose dependency preconditions are not yet satisfied (spec
    /// §4.5 step 2), so it reaches the state the spec requires it to wait
    /// in rather than sitting in `INSTALLED`. Idempotent: a no-op, returning
    /// `false`, if already parked in `STARTING`. `Supervisor::start_component`
    /// later resumes the startup phase out of this same `STARTING` exactly
    /// as it would out of a freshly-begun one.
    pub fn park_starting(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.current != State::Installed {
            return false;
        }
        inner.current = State::Starting;
        true
    }

    /// `ERRORED`/`FINISHED` → `NEW`: the always-available reconfigure edge.
    pub fn reconfigure(&self) -> bool {
        let mut inner = self.inner.lock();
        if !matches!(inner.current, State::Errored | State::Finished | State::Broken) {
            return false;
        }
        inner.cancel.cancel();
        inner.generation += 1;
        inner.current = State::New;
        inner.last_error = None;
        true
    }

    /// Increments `stateGeneration`, interrupts the backing task, and runs
    /// the `shutdown` phase with its own timeout; forced termination (via
    /// cancellation) if it overruns.
    pub async fn shutdown(&self, ctx: &PhaseContext, timeout: Duration) -> Result<(), KernelError> {
        let (token, generation) = self.begin_transition(State::Stopping);
        let result = tokio::time::timeout(timeout + self.config.shutdown_grace, async {
            self.adapter.run_phase(Phase::Shutdown, ctx, token.clone()).await
        })
        .await;
        if result.is_err() {
            token.cancel();
        }
        self.commit_if_current(generation, State::Finished);
        match result {
            Ok(Err(err)) => Err(KernelError::PhaseFailed { component: self.name.clone(), phase: Phase::Shutdown, source: err }),
            _ => Ok(()),
        }
    }
}

/// A no-op adapter phase failure used by tests that just need an
/// [`AdapterError`] value.
#[cfg(test)]
pub(crate) fn test_error() -> AdapterError {
    AdapterError::CodeBacked("boom".into())
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
