// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Spec §8 scenario 6: circular dependency rejected. A recipe graph with a
//! cycle must never be accepted into the live dependency graph: the second
//! `locate()` call that would close the cycle fails outright, rather than
//! being accepted and discovered only later at startup-ordering time.

use std::sync::Arc;

use hearth_adapters::ServiceRegistry;
use hearth_core::FakeClock;
use hearth_kernel::{KernelError, Supervisor};
use hearth_recipes::{ComponentRecipe, LifecycleScripts, Platform, PlatformResolver};

fn recipe(name: &str, dependencies: Vec<&str>) -> ComponentRecipe {
    ComponentRecipe {
        name: name.to_string(),
        version: "1.0.0".into(),
        dependencies: dependencies.into_iter().map(String::from).collect(),
        lifecycle: LifecycleScripts::default(),
        resource_limits: Default::default(),
        artifacts: Vec::new(),
        platforms: Default::default(),
    }
}

#[test]
fn direct_cycle_between_two_components_is_rejected() {
    let config = Arc::new(hearth_config::ConfigTree::new());
    let resolver = PlatformResolver::new(Platform::new([("all", 0u32)]));
    let supervisor = Supervisor::new(config, FakeClock::new(), ServiceRegistry::new(), resolver, std::env::temp_dir());

    supervisor.locate("a", recipe("a", vec!["b:RUNNING"])).unwrap();
    let err = supervisor.locate("b", recipe("b", vec!["a:RUNNING"])).unwrap_err();

    assert!(matches!(err, KernelError::CircularDependency { .. }), "expected CircularDependency, got {err:?}");
}

#[test]
fn self_dependency_is_rejected() {
    let config = Arc::new(hearth_config::ConfigTree::new());
    let resolver = PlatformResolver::new(Platform::new([("all", 0u32)]));
    let supervisor = Supervisor::new(config, FakeClock::new(), ServiceRegistry::new(), resolver, std::env::temp_dir());

    let err = supervisor.locate("a", recipe("a", vec!["a:RUNNING"])).unwrap_err();
    assert!(matches!(err, KernelError::CircularDependency { .. }));
}

#[test]
fn three_way_cycle_is_rejected_on_the_closing_edge() {
    let config = Arc::new(hearth_config::ConfigTree::new());
    let resolver = PlatformResolver::new(Platform::new([("all", 0u32)]));
    let supervisor = Supervisor::new(config, FakeClock::new(), ServiceRegistry::new(), resolver, std::env::temp_dir());

    supervisor.locate("a", recipe("a", vec!["b:RUNNING"])).unwrap();
    supervisor.locate("b", recipe("b", vec!["c:RUNNING"])).unwrap();
    let err = supervisor.locate("c", recipe("c", vec!["a:RUNNING"])).unwrap_err();

    assert!(matches!(err, KernelError::CircularDependency { .. }));
}
