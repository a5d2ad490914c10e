// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Component lifecycle state.
//!
//! ```text
//! NEW --install--> INSTALLED --start--> STARTING --ready--> RUNNING --stop--> STOPPING --done--> FINISHED
//!   \                  \                    \                  \                                    /
//!    `-----------------------------------------ERRORED-----------------------------------------reconfigure --> NEW
//!                         \-- handleError --> (INSTALLED | BROKEN)
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    New,
    Installed,
    Starting,
    Running,
    Stopping,
    Finished,
    Errored,
    Broken,
}

crate::simple_display! {
    State {
        New => "NEW",
        Installed => "INSTALLED",
        Starting => "STARTING",
        Running => "RUNNING",
        Stopping => "STOPPING",
        Finished => "FINISHED",
        Errored => "ERRORED",
        Broken => "BROKEN",
    }
}

impl State {
    /// RUNNING and FINISHED are the two states a dependent can rely on.
    pub fn is_happy(&self) -> bool {
        matches!(self, State::Running | State::Finished)
    }

    /// FINISHED and BROKEN never transition again without an explicit
    /// reconfigure back to NEW.
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Finished | State::Broken)
    }

    /// Whether `to` is a transition the state machine allows directly from
    /// `self`, per the diagram above, excluding the always-available
    /// `reconfigure -> NEW` and `handleError` edges which the Lifecycle
    /// evaluates with extra context (see `hearth-kernel::lifecycle`).
    pub fn allows(&self, to: State) -> bool {
        use State::*;
        matches!(
            (self, to),
            (New, Installed)
                | (Installed, Starting)
                | (Starting, Running)
                | (Running, Stopping)
                | (Stopping, Finished)
                | (New, Errored)
                | (Installed, Errored)
                | (Starting, Errored)
                | (Running, Errored)
                | (Stopping, Errored)
                | (Errored, New)
                | (Errored, Installed)
                | (Errored, Broken)
                | (Finished, New)
        )
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
