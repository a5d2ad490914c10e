// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! The boot sequence (SPEC_FULL §2): construct the DI context and config
//! store, replay the transaction log, resume any bootstrap left mid-flight
//! by a prior kernel-update activation, load recipes, and drive every
//! located component through `startupOrder()`.

use std::path::Path;
use std::sync::Arc;

use hearth_activator::KernelUpdateActivator;
use hearth_adapters::Context;
use hearth_config::{ConfigTree, PublishQueue, TLog};
use hearth_core::{Clock, SystemClock};
use hearth_kernel::Supervisor;
use hearth_recipes::{parser, ComponentRecipe, PlatformResolver};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::config::{is_newer_than, DaemonConfig};
use crate::error::DaemonError;
use crate::{env, pending, registry, tlog_mirror};

/// Everything the running daemon needs for the rest of the process
/// lifetime: the DI registry, the live config tree, and the supervisor
/// driving components through their lifecycles.
pub struct Daemon<C: Clock = SystemClock> {
    pub context: Context,
    pub config: Arc<ConfigTree>,
    pub tlog: Arc<Mutex<TLog>>,
    pub supervisor: Arc<Supervisor<C>>,
    pub daemon_config: DaemonConfig,
}

/// What [`boot`] decided should happen next.
pub enum StartupOutcome<C: Clock = SystemClock> {
    /// Normal boot completed; the daemon is running.
    Running(Daemon<C>),
    /// A resumed bootstrap (or a freshly staged one) asked the process to
    /// exit with this code before any component was started (spec §4.8
    /// step 5 / spec §6's exit-code contract).
    ExitImmediately(i32),
}

/// Drive the full boot sequence with the real system clock.
pub async fn boot(daemon_config: DaemonConfig) -> Result<StartupOutcome, DaemonError> {
    boot_with_clock(daemon_config, SystemClock).await
}

/// Drive the full boot sequence with an injected [`Clock`], so integration
/// tests can exercise startup without waiting on real backoff timers.
pub async fn boot_with_clock<C: Clock>(
    daemon_config: DaemonConfig,
    clock: C,
) -> Result<StartupOutcome<C>, DaemonError> {
    daemon_config.ensure_layout()?;

    // Step 2: the DI registry. Nothing is registered into it today beyond
    // what gets built directly below; it is carried on `Daemon` so a future
    // code-backed service has somewhere to register itself during its own
    // construction via `post_inject`.
    let context = Context::new();

    // Step 3: config tree + tlog replay + optional seed merge.
    let queue = PublishQueue::start();
    let config = Arc::new(ConfigTree::with_publish_queue(queue));
    let tlog_path = daemon_config.tlog_path();
    let replayed = TLog::replay_into(&tlog_path, &config)?;
    tracing::info!(replayed, path = %tlog_path.display(), "replayed transaction log");

    merge_seed_if_newer(&config, &daemon_config, clock.epoch_ms())?;

    let tlog = Arc::new(Mutex::new(TLog::open(&tlog_path)?));
    tlog_mirror::wire(&config, tlog.clone());

    // Step 5: dependency graph + supervisor.
    let supervisor = Arc::new(
        Supervisor::new(
            config.clone(),
            clock,
            registry::build(),
            PlatformResolver::for_current_host(),
            daemon_config.work_dir(),
        )
        .with_extra_env(phase_environment(&daemon_config)),
    );

    // Step 6: resume a pending bootstrap left by a prior kernel-update
    // activation, if the last run exited before it finished.
    if let Some(outcome) = resume_pending_activation(&daemon_config).await? {
        return Ok(StartupOutcome::ExitImmediately(outcome));
    }

    // Step 7: load every recipe on disk and drive startupOrder().
    for recipe in load_recipes(&daemon_config.recipes_dir())? {
        let name = recipe.name.clone();
        supervisor.locate(&name, recipe)?;
    }
    supervisor.startup_all().await?;

    Ok(StartupOutcome::Running(Daemon { context, config, tlog, supervisor, daemon_config }))
}

/// Merge `config.init_config` (if given on the command line) or the
/// standing `config/config.yaml` seed (if newer than the tlog's own last
/// modification) into the tree, ahead of normal operation. This mirrors the
/// modtime-gated merge rule the tree already applies to every other write
/// (spec §4.1): a seed older than what the tlog already recorded loses.
fn merge_seed_if_newer(config: &ConfigTree, daemon_config: &DaemonConfig, now_ms: u64) -> Result<(), DaemonError> {
    if let Some(init_config) = &daemon_config.init_config {
        merge_seed_file(config, init_config, now_ms)?;
    }

    let seed_path = daemon_config.yaml_seed_path();
    let since = last_modified_ms(&daemon_config.tlog_path()).unwrap_or(0);
    if is_newer_than(&seed_path, since) {
        merge_seed_file(config, &seed_path, now_ms)?;
    }
    Ok(())
}

fn merge_seed_file(config: &ConfigTree, path: &Path, timestamp: u64) -> Result<(), DaemonError> {
    let Ok(bytes) = std::fs::read(path) else { return Ok(()) };
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => config.merge_json(&bytes, timestamp)?,
        _ => config.merge_yaml(&bytes, timestamp)?,
    }
    Ok(())
}

fn last_modified_ms(path: &Path) -> Option<u64> {
    let meta = std::fs::metadata(path).ok()?;
    let modified = meta.modified().ok()?;
    let duration = modified.duration_since(std::time::UNIX_EPOCH).ok()?;
    Some(duration.as_millis() as u64)
}

/// If a bootstrap task list was left mid-run by a previous process, resume
/// it from where it stopped. Returns `Some(exit_code)` if the process must
/// exit again before doing anything else, `None` if there was nothing
/// pending (the common case).
async fn resume_pending_activation(daemon_config: &DaemonConfig) -> Result<Option<i32>, DaemonError> {
    let deployments_dir = daemon_config.deployments_dir();
    let Some(marker) = pending::find(&deployments_dir)? else { return Ok(None) };

    tracing::info!(
        deployment = %marker.deployment.deployment_id,
        from_line = marker.from_line,
        "resuming bootstrap task list from prior run"
    );

    let activator = KernelUpdateActivator::new();
    let cancel = CancellationToken::new();
    let result = activator.run(&daemon_config.root, &marker.deployment, marker.from_line, &cancel).await?;

    pending::clear(&deployments_dir, &marker.deployment.deployment_id.to_string())?;
    Ok(Some(result.exit_code))
}

/// Proxy variables, `SVCUID`, and the default component user (spec §6),
/// resolved once here and merged into every phase's environment by
/// [`Supervisor::with_extra_env`].
fn phase_environment(daemon_config: &DaemonConfig) -> std::collections::HashMap<String, String> {
    let mut env = env::proxy_env();
    if let Some(svcuid) = env::svcuid() {
        env.insert("SVCUID".to_string(), svcuid);
    }
    if let Some(user) = &daemon_config.component_default_user {
        env.insert("HEARTH_DEFAULT_USER".to_string(), user.clone());
    }
    env
}

fn load_recipes(dir: &Path) -> Result<Vec<ComponentRecipe>, DaemonError> {
    let mut paths: Vec<_> = match std::fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok().map(|e| e.path())).collect(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(err) => return Err(err.into()),
    };
    paths.sort();

    let mut recipes = Vec::new();
    for path in paths {
        if parser::Format::from_extension(&path).is_none() {
            continue;
        }
        recipes.push(parser::parse_recipe_file(&path)?);
    }
    Ok(recipes)
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
