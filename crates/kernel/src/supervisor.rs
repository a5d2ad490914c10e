// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Supervisor (Kernel): locates/instantiates services, fans global state
//! changes out to listeners, and drives orderly startup/shutdown.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use hearth_adapters::{ExternalScriptAdapter, Phase, PhaseContext, ServiceAdapter, ServiceRegistry};
use hearth_config::ConfigTree;
use hearth_core::{Clock, RequiredState, State};
use hearth_recipes::{ComponentRecipe, PlatformResolver};
use parking_lot::Mutex;

use crate::dependency_graph::DependencyGraph;
use crate::error::KernelError;
use crate::lifecycle::{Lifecycle, LifecycleConfig};

/// `(component, oldState, newState)` fan-out signature for global state
/// listeners (spec §4.7); registered through the DI Context by callers, not
/// by this crate.
pub type StateListener = Arc<dyn Fn(&str, State, State) + Send + Sync>;

struct ComponentEntry<C: Clock> {
    recipe: ComponentRecipe,
    lifecycle: Arc<Lifecycle<C>>,
}

/// Owns service instantiation, the live [`DependencyGraph`], and orderly
/// shutdown. Does not own its own thread pool: phases are spawned onto
/// whatever `tokio` runtime the caller (`hearthd`) is running inside, sized
/// per spec §4.7/§5 by that runtime's builder.
pub struct Supervisor<C: Clock = hearth_core::SystemClock> {
    config: Arc<ConfigTree>,
    clock: C,
    lifecycle_config: LifecycleConfig,
    registry: ServiceRegistry,
    platform: PlatformResolver,
    work_root: PathBuf,
    extra_env: HashMap<String, String>,
    graph: Mutex<DependencyGraph>,
    components: Mutex<HashMap<String, ComponentEntry<C>>>,
    listeners: Mutex<Vec<StateListener>>,
}

impl<C: Clock> Supervisor<C> {
    pub fn new(
        config: Arc<ConfigTree>,
        clock: C,
        registry: ServiceRegistry,
        platform: PlatformResolver,
        work_root: PathBuf,
    ) -> Self {
        Self {
            config,
            clock,
            lifecycle_config: LifecycleConfig::default(),
            registry,
            platform,
            work_root,
            extra_env: HashMap::new(),
            graph: Mutex::new(DependencyGraph::new()),
            components: Mutex::new(HashMap::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn with_lifecycle_config(mut self, config: LifecycleConfig) -> Self {
        self.lifecycle_config = config;
        self
    }

    /// Environment variables merged into every phase's [`PhaseContext::env`]
    /// (spec §6: proxy variables and `SVCUID` are resolved once at daemon
    /// startup and threaded through here rather than read per-phase).
    pub fn with_extra_env(mut self, extra_env: HashMap<String, String>) -> Self {
        self.extra_env = extra_env;
        self
    }

    pub fn add_listener(&self, listener: StateListener) {
        self.listeners.lock().push(listener);
    }

    fn fan_out(&self, name: &str, old: State, new: State) {
        if old == new {
            return;
        }
        for listener in self.listeners.lock().iter() {
            listener(name, old, new);
        }
    }

    /// Look up the service's recipe, select the best platform variant, and
    /// construct either a code-backed adapter (name registered at build
    /// time) or the generic external-script adapter. Idempotent: repeated
    /// calls for an already-located component return the cached instance.
    pub fn locate(&self, name: &str, recipe: ComponentRecipe) -> Result<Arc<Lifecycle<C>>, KernelError> {
        if let Some(entry) = self.components.lock().get(name) {
            return Ok(entry.lifecycle.clone());
        }

        let tag = self.platform.platform().tags().first().map(|(t, _)| t.as_str()).unwrap_or("all");
        let resolved = recipe.resolved_for(tag);

        let adapter: Arc<dyn ServiceAdapter> =
            self.registry.construct(name).unwrap_or_else(|| Arc::new(ExternalScriptAdapter::new()));

        let lifecycle =
            Arc::new(Lifecycle::new(name, adapter, self.clock.clone(), self.lifecycle_config));

        {
            let mut graph = self.graph.lock();
            graph.add_node(name);
            for dep in resolved.dependencies().map_err(|_| KernelError::RecipeNotFound { name: name.to_string() })? {
                graph.add_edge(name, &dep.name, dep.required_state.0)?;
            }
        }

        self.components.lock().insert(
            name.to_string(),
            ComponentEntry { recipe: resolved, lifecycle: lifecycle.clone() },
        );
        Ok(lifecycle)
    }

    pub fn state_of(&self, name: &str) -> Option<State> {
        self.components.lock().get(name).map(|e| e.lifecycle.state())
    }

    fn all_states(&self) -> HashMap<String, State> {
        self.components.lock().iter().map(|(name, e)| (name.clone(), e.lifecycle.state())).collect()
    }

    pub fn explain(&self, name: &str) -> Vec<(String, RequiredState, bool)> {
        self.graph.lock().explain(name, &self.all_states())
    }

    fn phase_context(&self, name: &str, recipe: &ComponentRecipe) -> PhaseContext {
        PhaseContext {
            component: name.to_string(),
            recipe: recipe.clone(),
            work_dir: self.work_root.join(name),
            env: self.extra_env.clone(),
        }
    }

    /// Drive one component through install → startup → running. Dependency
    /// preconditions (spec §4.5 step 2) are checked specifically before the
    /// startup phase, not before install: an unmet dependency parks the
    /// component in `STARTING` (spec §8 scenario 2 — "B: never leaves
    /// STARTING"), and a later [`Self::on_state_change`] call resumes the
    /// startup phase out of that same parked `STARTING` once the dependency
    /// is satisfied.
    pub async fn start_component(&self, name: &str) -> Result<(), KernelError> {
        let (lifecycle, recipe) = {
            let components = self.components.lock();
            let entry = components.get(name).ok_or_else(|| KernelError::UnknownComponent { name: name.to_string() })?;
            (entry.lifecycle.clone(), entry.recipe.clone())
        };

        let ctx = self.phase_context(name, &recipe);

        if lifecycle.state() == State::New {
            let before = lifecycle.state();
            let timeout = recipe.lifecycle.install.as_ref().map(|s| s.timeout).unwrap_or(Duration::from_secs(120));
            if !self.drive_phase(name, &lifecycle, &ctx, Phase::Install, timeout, State::Installed, State::Installed, before).await? {
                return Ok(());
            }
        }

        if matches!(lifecycle.state(), State::Installed | State::Starting) {
            if !self.graph.lock().satisfied_by(name, &self.all_states()) {
                let before = lifecycle.state();
                if lifecycle.park_starting() {
                    self.fan_out(name, before, lifecycle.state());
                }
                return Ok(());
            }

            let before = lifecycle.state();
            let timeout = recipe.lifecycle.startup.as_ref().map(|s| s.timeout).unwrap_or(Duration::from_secs(120));
            if !self.drive_phase(name, &lifecycle, &ctx, Phase::Startup, timeout, State::Starting, State::Running, before).await? {
                return Ok(());
            }
        }

        if lifecycle.state() == State::Running && recipe.lifecycle.run.is_some() {
            let before = lifecycle.state();
            let timeout = recipe.lifecycle.run.as_ref().map(|s| s.timeout).unwrap_or(Duration::from_secs(120));
            self.drive_phase(name, &lifecycle, &ctx, Phase::Run, timeout, State::Running, State::Finished, before).await?;
        }

        Ok(())
    }

    /// Run one phase and fan out its state change. A phase timeout or
    /// script/process failure is not propagated to the caller: the
    /// Lifecycle has already recorded it (`ERRORED`/`BROKEN` per spec
    /// §4.5's `handleError` policy and failure window), and the rest of
    /// `startup_order()` must keep walking past a failed component rather
    /// than aborting the whole drive (spec §8 scenario 2: a dependent must
    /// still be attempted — and correctly park — after its dependency
    /// errors). Returns `false` when the phase did not succeed, so the
    /// caller knows not to attempt the next phase.
    async fn drive_phase(
        &self,
        name: &str,
        lifecycle: &Lifecycle<C>,
        ctx: &PhaseContext,
        phase: Phase,
        timeout: Duration,
        transitional: State,
        success: State,
        before: State,
    ) -> Result<bool, KernelError> {
        let result = lifecycle.run_phase(ctx, phase, timeout, transitional, success).await;
        self.fan_out(name, before, lifecycle.state());
        match result {
            Ok(_) => Ok(true),
            Err(KernelError::PhaseFailed { .. } | KernelError::Timeout { .. }) => {
                tracing::warn!(component = name, %phase, state = ?lifecycle.state(), "phase did not succeed, component escalated");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Called after any component's state changes; re-attempts startup of
    /// every parked dependent (spec §4.6 `onStateChange`).
    pub async fn on_state_change(&self, name: &str) -> Result<(), KernelError> {
        let dependents = self.graph.lock().dependents_of(name);
        for dependent in dependents {
            self.start_component(&dependent).await?;
        }
        Ok(())
    }

    /// Drives `startup_order()` for every component currently located,
    /// sequentially — a valid serialization of the concurrency model, since
    /// dependency-first ordering already guarantees each component's
    /// preconditions hold by the time its turn comes.
    pub async fn startup_all(&self) -> Result<(), KernelError> {
        let order = self.graph.lock().startup_order()?;
        for name in order {
            self.start_component(&name).await?;
        }
        Ok(())
    }

    /// Drains the ConfigTree's publish queue, then walks `shutdownOrder`,
    /// running each component's `shutdown` transition. Returns `exit_code`
    /// for the loader regardless of per-component shutdown errors (best
    /// effort, matching spec §4.7's "awaiting FINISHED or timeout").
    pub async fn shutdown(&self, timeout: Duration, exit_code: i32) -> i32 {
        self.config.publish_queue().drain();

        let order = match self.graph.lock().shutdown_order() {
            Ok(order) => order,
            Err(_) => self.components.lock().keys().cloned().collect(),
        };

        for name in order {
            let Some((lifecycle, recipe)) = self
                .components
                .lock()
                .get(&name)
                .map(|e| (e.lifecycle.clone(), e.recipe.clone()))
            else {
                continue;
            };
            let ctx = self.phase_context(&name, &recipe);
            let before = lifecycle.state();
            if lifecycle.shutdown(&ctx, timeout).await.is_ok() {
                self.fan_out(&name, before, lifecycle.state());
            }
        }

        exit_code
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
