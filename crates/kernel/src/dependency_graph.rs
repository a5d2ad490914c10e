// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! The dependency graph: `(from, to, requiredState)` edges between
//! components, with startup/shutdown ordering and dependency-precondition
//! checks.
//!
//! Mutable at runtime: a configuration change may add or remove edges while
//! services are live. Stored as name-keyed adjacency rather than
//! pointer-linked nodes, so edges can be added/removed without touching
//! Rust's ownership graph.

use crate::error::KernelError;
use hearth_core::{RequiredState, State};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// Edges with required-state predicates between named components, answering
/// precondition and ordering queries for the Lifecycle/Supervisor.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: IndexSet<String>,
    /// `from -> [(to, requiredState)]`: `from` depends on `to`.
    edges: IndexMap<String, Vec<(String, RequiredState)>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: &str) {
        self.nodes.insert(name.to_string());
        self.edges.entry(name.to_string()).or_default();
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    /// Declare that `from` depends on `to` at `required`. Rejects the edge
    /// with [`KernelError::CircularDependency`] if it would close a cycle.
    pub fn add_edge(&mut self, from: &str, to: &str, required: RequiredState) -> Result<(), KernelError> {
        self.add_node(from);
        self.add_node(to);

        if from == to || self.reaches(to, from) {
            return Err(KernelError::CircularDependency { components: vec![from.to_string(), to.to_string()] });
        }

        let entry = self.edges.entry(from.to_string()).or_default();
        if !entry.iter().any(|(t, _)| t == to) {
            entry.push((to.to_string(), required));
        }
        Ok(())
    }

    pub fn remove_edge(&mut self, from: &str, to: &str) {
        if let Some(entry) = self.edges.get_mut(from) {
            entry.retain(|(t, _)| t != to);
        }
    }

    pub fn dependencies_of(&self, name: &str) -> &[(String, RequiredState)] {
        self.edges.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Components that depend on `name` (reverse edges), used to wake parked
    /// dependents on a state change.
    pub fn dependents_of(&self, name: &str) -> Vec<String> {
        self.edges
            .iter()
            .filter(|(_, deps)| deps.iter().any(|(to, _)| to == name))
            .map(|(from, _)| from.clone())
            .collect()
    }

    /// True iff `target` is reachable from `start` by following dependency
    /// edges (`start` depends on `target`, directly or transitively).
    fn reaches(&self, start: &str, target: &str) -> bool {
        let mut seen = IndexSet::new();
        let mut stack = vec![start.to_string()];
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !seen.insert(current.clone()) {
                continue;
            }
            for (to, _) in self.dependencies_of(&current) {
                stack.push(to.clone());
            }
        }
        false
    }

    /// True iff every dependency of `name` is present in `states` at or
    /// above its required state.
    pub fn satisfied_by(&self, name: &str, states: &HashMap<String, State>) -> bool {
        self.dependencies_of(name).iter().all(|(dep, required)| {
            let actual = states.get(dep).copied().unwrap_or(State::New);
            required.is_satisfied_by(actual)
        })
    }

    /// Per-dependency breakdown used by status/debug output and by tests
    /// asserting a dependent never leaves STARTING.
    pub fn explain(&self, name: &str, states: &HashMap<String, State>) -> Vec<(String, RequiredState, bool)> {
        self.dependencies_of(name)
            .iter()
            .map(|(dep, required)| {
                let actual = states.get(dep).copied().unwrap_or(State::New);
                (dep.clone(), *required, required.is_satisfied_by(actual))
            })
            .collect()
    }

    /// Dependency-first order: a component never precedes one of its own
    /// dependencies. Kahn's algorithm over the "depends on" edges, processed
    /// in insertion order for determinism.
    pub fn startup_order(&self) -> Result<Vec<String>, KernelError> {
        let mut remaining: IndexMap<String, usize> =
            self.nodes.iter().map(|n| (n.clone(), self.dependencies_of(n).len())).collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        loop {
            let ready: Vec<String> =
                remaining.iter().filter(|(_, &count)| count == 0).map(|(n, _)| n.clone()).collect();
            if ready.is_empty() {
                break;
            }
            for name in ready {
                remaining.shift_remove(&name);
                order.push(name.clone());
                for dependent in self.dependents_of(&name) {
                    if let Some(count) = remaining.get_mut(&dependent) {
                        *count = count.saturating_sub(1);
                    }
                }
            }
        }

        if !remaining.is_empty() {
            return Err(KernelError::CircularDependency { components: remaining.keys().cloned().collect() });
        }
        Ok(order)
    }

    /// Reverse of [`Self::startup_order`].
    pub fn shutdown_order(&self) -> Result<Vec<String>, KernelError> {
        let mut order = self.startup_order()?;
        order.reverse();
        Ok(order)
    }
}

#[cfg(test)]
#[path = "dependency_graph_tests.rs"]
mod tests;
