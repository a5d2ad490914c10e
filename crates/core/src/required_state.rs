// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Ordering of [`crate::state::State`] used to evaluate dependency
//! preconditions: `NEW < INSTALLED < STARTING < RUNNING < FINISHED`.

use crate::state::State;
use serde::{Deserialize, Serialize};

/// The minimum state a dependency must reach before a dependent is allowed
/// to proceed. Each dependency is declared as `name[:requiredState]`, with
/// `requiredState` defaulting to `RUNNING` when omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredState(pub State);

impl Default for RequiredState {
    fn default() -> Self {
        RequiredState(State::Running)
    }
}

/// Rank used only for the dependency-precondition ordering; `Broken` and
/// `Errored` never satisfy a precondition regardless of rank.
fn rank(state: State) -> u8 {
    match state {
        State::New => 0,
        State::Installed => 1,
        State::Starting => 2,
        State::Running => 3,
        // Stopping is on its way down; it does not satisfy a RUNNING
        // precondition even though the process may still be alive.
        State::Stopping => 2,
        State::Finished => 4,
        State::Errored => 0,
        State::Broken => 0,
    }
}

impl RequiredState {
    /// True iff `actual` satisfies this requirement.
    pub fn is_satisfied_by(&self, actual: State) -> bool {
        if matches!(actual, State::Errored | State::Broken) {
            return false;
        }
        rank(actual) >= rank(self.0)
    }
}

#[cfg(test)]
#[path = "required_state_tests.rs"]
mod tests;
