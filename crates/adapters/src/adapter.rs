// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! [`ServiceAdapter`]: the Lifecycle's view of "how to actually run this
//! component's phases".
//!
//! Spec §4.7 + §9's first design note: the reference implementation finds
//! service implementations via classpath scanning for an annotation. That
//! has no equivalent in a systems language, so this crate replaces it with
//! an explicit build-time registry (`ServiceRegistry`) of `(name,
//! constructor)` pairs for Rust-native ("code-backed") services, which the
//! Supervisor consults before falling back to the generic
//! [`ExternalScriptAdapter`] that runs a recipe's shell/command strings.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use hearth_recipes::{ComponentRecipe, LifecycleScript};
use hearth_shell::{ExecSpec, ShellError, ShellRunner};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// One of the lifecycle phases named in spec §3/§4.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Install,
    Startup,
    Run,
    Shutdown,
    Recover,
}

hearth_core::simple_display! {
    Phase {
        Install => "install",
        Startup => "startup",
        Run => "run",
        Shutdown => "shutdown",
        Recover => "recover",
    }
}

/// Per-invocation context handed to an adapter: the component's resolved
/// recipe, its working directory, and the environment the phase should run
/// with (including `SVCUID`, per spec §6).
#[derive(Debug, Clone)]
pub struct PhaseContext {
    pub component: String,
    pub recipe: ComponentRecipe,
    pub work_dir: PathBuf,
    pub env: HashMap<String, String>,
}

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("phase execution failed: {0}")]
    Shell(#[from] ShellError),

    #[error("component {component} exited {exit_code} during {phase}")]
    NonZeroExit { component: String, phase: Phase, exit_code: i32 },

    #[error("code-backed service error: {0}")]
    CodeBacked(String),
}

/// What running a phase produced: a process exit for external-script
/// services, or just success/failure for code-backed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    Succeeded,
    /// The phase's timeout fired before it completed.
    TimedOut,
}

/// The Lifecycle's abstraction over "how to run phase X for this
/// component" — implemented either by [`ExternalScriptAdapter`] (generic
/// shell execution of the recipe's scripts) or by a hand-registered
/// [`CodeBackedAdapter`].
#[async_trait]
pub trait ServiceAdapter: Send + Sync {
    async fn run_phase(
        &self,
        phase: Phase,
        ctx: &PhaseContext,
        cancel: CancellationToken,
    ) -> Result<PhaseOutcome, AdapterError>;
}

/// Generic executor of a recipe's `install`/`startup`/`run`/`shutdown`/
/// `recover` shell strings, for components that are plain scripts rather
/// than Rust types registered at build time.
pub struct ExternalScriptAdapter {
    shell: ShellRunner,
}

impl ExternalScriptAdapter {
    pub fn new() -> Self {
        Self { shell: ShellRunner::new() }
    }
}

impl Default for ExternalScriptAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn script_for<'a>(recipe: &'a ComponentRecipe, phase: Phase) -> Option<&'a LifecycleScript> {
    let scripts = &recipe.lifecycle;
    match phase {
        Phase::Install => scripts.install.as_ref(),
        Phase::Startup => scripts.startup.as_ref(),
        Phase::Run => scripts.run.as_ref(),
        Phase::Shutdown => scripts.shutdown.as_ref(),
        Phase::Recover => scripts.recover.as_ref(),
    }
}

#[async_trait]
impl ServiceAdapter for ExternalScriptAdapter {
    async fn run_phase(
        &self,
        phase: Phase,
        ctx: &PhaseContext,
        cancel: CancellationToken,
    ) -> Result<PhaseOutcome, AdapterError> {
        let Some(script) = script_for(&ctx.recipe, phase) else {
            // No script defined for this phase: a no-op success, matching
            // the reference project's "phase absent => nothing to do".
            return Ok(PhaseOutcome::Succeeded);
        };

        let spec =
            ExecSpec::new("sh").arg("-c").arg(script.script.clone()).cwd(ctx.work_dir.clone()).timeout(script.timeout);
        let spec = ctx.env.iter().fold(spec, |spec, (k, v)| spec.env(k.clone(), v.clone()));

        let output = self.shell.run(&spec, &cancel).await?;
        match output.outcome {
            hearth_shell::Outcome::Exited(0) => Ok(PhaseOutcome::Succeeded),
            hearth_shell::Outcome::Exited(code) => {
                Err(AdapterError::NonZeroExit { component: ctx.component.clone(), phase, exit_code: code })
            }
            hearth_shell::Outcome::TimedOut => Ok(PhaseOutcome::TimedOut),
            hearth_shell::Outcome::Cancelled => Ok(PhaseOutcome::TimedOut),
        }
    }
}

/// A component implemented as native Rust code rather than a shell script.
/// Each phase defaults to a no-op success so a service only needs to
/// implement the phases it cares about.
#[async_trait]
pub trait CodeBackedService: Send + Sync {
    async fn install(&self, _ctx: &PhaseContext, _cancel: CancellationToken) -> Result<(), AdapterError> {
        Ok(())
    }
    async fn startup(&self, _ctx: &PhaseContext, _cancel: CancellationToken) -> Result<(), AdapterError> {
        Ok(())
    }
    async fn run(&self, _ctx: &PhaseContext, _cancel: CancellationToken) -> Result<(), AdapterError> {
        Ok(())
    }
    async fn shutdown(&self, _ctx: &PhaseContext, _cancel: CancellationToken) -> Result<(), AdapterError> {
        Ok(())
    }
    /// Defaults to re-running `install`, matching `ExternalScriptAdapter`'s
    /// "no recover script => reinstall" fallback (spec §4.5 addition).
    async fn recover(&self, ctx: &PhaseContext, cancel: CancellationToken) -> Result<(), AdapterError> {
        self.install(ctx, cancel).await
    }
}

/// Adapts a [`CodeBackedService`] into a [`ServiceAdapter`].
pub struct CodeBackedAdapter<T> {
    inner: Arc<T>,
}

impl<T: CodeBackedService> CodeBackedAdapter<T> {
    pub fn new(inner: Arc<T>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: CodeBackedService> ServiceAdapter for CodeBackedAdapter<T> {
    async fn run_phase(
        &self,
        phase: Phase,
        ctx: &PhaseContext,
        cancel: CancellationToken,
    ) -> Result<PhaseOutcome, AdapterError> {
        let result = match phase {
            Phase::Install => self.inner.install(ctx, cancel).await,
            Phase::Startup => self.inner.startup(ctx, cancel).await,
            Phase::Run => self.inner.run(ctx, cancel).await,
            Phase::Shutdown => self.inner.shutdown(ctx, cancel).await,
            Phase::Recover => self.inner.recover(ctx, cancel).await,
        };
        result.map(|()| PhaseOutcome::Succeeded)
    }
}

/// Build-time registry of `(name, constructor)` pairs for code-backed
/// services, consulted by the Supervisor before it falls back to
/// [`ExternalScriptAdapter`] for a recipe with no matching registration.
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    constructors: HashMap<String, Arc<dyn Fn() -> Arc<dyn ServiceAdapter> + Send + Sync>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Arc<dyn ServiceAdapter> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(constructor));
    }

    pub fn construct(&self, name: &str) -> Option<Arc<dyn ServiceAdapter>> {
        self.constructors.get(name).map(|ctor| ctor())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
