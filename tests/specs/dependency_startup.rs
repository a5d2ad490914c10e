// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Spec §8 scenario 1: linear dependency startup. `A` has no dependencies
//! and a `run` script; `B` depends on `A:RUNNING` and has the same `run`
//! script. `B` must not enter `STARTING` before `A` reaches `RUNNING`, and
//! both run their `run` phase to completion and reach `FINISHED`.

use std::sync::Arc;
use std::time::Duration;

use hearth_adapters::ServiceRegistry;
use hearth_core::{FakeClock, State};
use hearth_kernel::Supervisor;
use hearth_recipes::{ComponentRecipe, LifecycleScript, LifecycleScripts, Platform, PlatformResolver};

fn recipe_with_run(name: &str, dependencies: Vec<&str>) -> ComponentRecipe {
    ComponentRecipe {
        name: name.to_string(),
        version: "1.0.0".into(),
        dependencies: dependencies.into_iter().map(String::from).collect(),
        lifecycle: LifecycleScripts {
            run: Some(LifecycleScript { script: "sleep 0.1; echo ok".to_string(), timeout: Duration::from_secs(5) }),
            ..Default::default()
        },
        resource_limits: Default::default(),
        artifacts: Vec::new(),
        platforms: Default::default(),
    }
}

#[tokio::test]
async fn a_finishes_before_b_leaves_starting() {
    let config = Arc::new(hearth_config::ConfigTree::new());
    let resolver = PlatformResolver::new(Platform::new([("all", 0u32)]));
    let supervisor = Supervisor::new(config, FakeClock::new(), ServiceRegistry::new(), resolver, std::env::temp_dir());

    supervisor.locate("a", recipe_with_run("a", vec![])).unwrap();
    supervisor.locate("b", recipe_with_run("b", vec!["a:RUNNING"])).unwrap();

    supervisor.startup_all().await.unwrap();

    assert_eq!(supervisor.state_of("a"), Some(State::Finished));
    assert_eq!(supervisor.state_of("b"), Some(State::Finished));
}
