// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

/// Proptest strategies for core types.
pub mod strategies {
    use crate::path::NodePath;
    use crate::state::State;
    use proptest::prelude::*;

    pub fn arb_state() -> impl Strategy<Value = State> {
        prop_oneof![
            Just(State::New),
            Just(State::Installed),
            Just(State::Starting),
            Just(State::Running),
            Just(State::Stopping),
            Just(State::Finished),
            Just(State::Errored),
            Just(State::Broken),
        ]
    }

    /// Path segments restricted to characters that need no escaping, plus a
    /// handful of names that exercise the escape path.
    pub fn arb_segment() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Z][a-zA-Z0-9_-]{0,12}",
            Just("has/slash".to_string()),
            Just("has\ttab".to_string()),
        ]
    }

    pub fn arb_node_path() -> impl Strategy<Value = NodePath> {
        proptest::collection::vec(arb_segment(), 0..5).prop_map(NodePath::new)
    }
}
