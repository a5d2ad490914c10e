// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

use super::*;
use hearth_core::State;
use std::collections::HashMap;

#[test]
fn startup_order_puts_dependencies_first() {
    let mut graph = DependencyGraph::new();
    graph.add_edge("b", "a", RequiredState(State::Running)).unwrap();
    let order = graph.startup_order().unwrap();
    assert_eq!(order, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn shutdown_order_is_reversed() {
    let mut graph = DependencyGraph::new();
    graph.add_edge("b", "a", RequiredState(State::Running)).unwrap();
    assert_eq!(graph.shutdown_order().unwrap(), vec!["b".to_string(), "a".to_string()]);
}

#[test]
fn rejects_direct_cycle() {
    let mut graph = DependencyGraph::new();
    graph.add_edge("p", "q", RequiredState::default()).unwrap();
    let err = graph.add_edge("q", "p", RequiredState::default()).unwrap_err();
    assert!(matches!(err, KernelError::CircularDependency { .. }));
}

#[test]
fn rejects_transitive_cycle() {
    let mut graph = DependencyGraph::new();
    graph.add_edge("a", "b", RequiredState::default()).unwrap();
    graph.add_edge("b", "c", RequiredState::default()).unwrap();
    let err = graph.add_edge("c", "a", RequiredState::default()).unwrap_err();
    assert!(matches!(err, KernelError::CircularDependency { .. }));
}

#[test]
fn satisfied_by_requires_rank_at_or_above() {
    let mut graph = DependencyGraph::new();
    graph.add_edge("b", "a", RequiredState(State::Running)).unwrap();

    let mut states = HashMap::new();
    states.insert("a".to_string(), State::Starting);
    assert!(!graph.satisfied_by("b", &states));

    states.insert("a".to_string(), State::Running);
    assert!(graph.satisfied_by("b", &states));
}

#[test]
fn errored_or_broken_dependency_never_satisfies() {
    let mut graph = DependencyGraph::new();
    graph.add_edge("b", "a", RequiredState(State::New)).unwrap();
    let mut states = HashMap::new();
    states.insert("a".to_string(), State::Errored);
    assert!(!graph.satisfied_by("b", &states));
}

#[test]
fn dependents_of_finds_reverse_edges() {
    let mut graph = DependencyGraph::new();
    graph.add_edge("b", "a", RequiredState::default()).unwrap();
    graph.add_edge("c", "a", RequiredState::default()).unwrap();
    let mut dependents = graph.dependents_of("a");
    dependents.sort();
    assert_eq!(dependents, vec!["b".to_string(), "c".to_string()]);
}

#[test]
fn explain_reports_each_dependency_and_whether_satisfied() {
    let mut graph = DependencyGraph::new();
    graph.add_edge("b", "a", RequiredState(State::Running)).unwrap();
    let mut states = HashMap::new();
    states.insert("a".to_string(), State::Starting);
    let explanation = graph.explain("b", &states);
    assert_eq!(explanation, vec![("a".to_string(), RequiredState(State::Running), false)]);
}

#[test]
fn edge_removal_during_live_dependency_is_permitted() {
    let mut graph = DependencyGraph::new();
    graph.add_edge("b", "a", RequiredState::default()).unwrap();
    graph.remove_edge("b", "a");
    assert!(graph.dependencies_of("b").is_empty());
}
