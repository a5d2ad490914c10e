// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Spec §8 scenario 2: dependent dies, dependent parks. `A`'s real `sh -c`
//! install script exits nonzero; `A` escalates to `ERRORED` and `B`, which
//! depends on `A:RUNNING`, installs fine on its own but then parks in
//! `STARTING` forever, since its precondition is never satisfied. Unlike
//! `dependency_startup.rs`, this drives the real `ExternalScriptAdapter` (an
//! actual subprocess), not a mocked adapter.

use std::sync::Arc;
use std::time::Duration;

use hearth_adapters::ServiceRegistry;
use hearth_core::{FakeClock, RequiredState, State};
use hearth_kernel::Supervisor;
use hearth_recipes::{ComponentRecipe, LifecycleScript, LifecycleScripts, Platform, PlatformResolver};

fn recipe(name: &str, dependencies: Vec<&str>, install: Option<&str>) -> ComponentRecipe {
    ComponentRecipe {
        name: name.to_string(),
        version: "1.0.0".into(),
        dependencies: dependencies.into_iter().map(String::from).collect(),
        lifecycle: LifecycleScripts {
            install: install
                .map(|script| LifecycleScript { script: script.to_string(), timeout: Duration::from_secs(5) }),
            ..Default::default()
        },
        resource_limits: Default::default(),
        artifacts: Vec::new(),
        platforms: Default::default(),
    }
}

#[tokio::test]
async fn dependent_never_leaves_starting_when_dependency_errors() {
    let config = Arc::new(hearth_config::ConfigTree::new());
    let resolver = PlatformResolver::new(Platform::new([("all", 0u32)]));
    let supervisor = Supervisor::new(config, FakeClock::new(), ServiceRegistry::new(), resolver, std::env::temp_dir());

    supervisor.locate("a", recipe("a", vec![], Some("exit 7"))).unwrap();
    supervisor.locate("b", recipe("b", vec!["a:RUNNING"], None)).unwrap();

    supervisor.startup_all().await.unwrap();

    assert_eq!(supervisor.state_of("a"), Some(State::Errored));
    assert_eq!(supervisor.state_of("b"), Some(State::Starting));
    assert_eq!(supervisor.explain("b"), vec![("a".to_string(), RequiredState(State::Running), false)]);
}
