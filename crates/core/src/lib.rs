// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hearth-core: shared identifiers, clock abstraction, and state types used
//! across the orchestration core.

pub mod macros;

pub mod clock;
pub mod id;
pub mod path;
pub mod required_state;
pub mod state;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Backoff, Clock, FakeClock, SystemClock};
pub use id::IdBuf;
pub use path::NodePath;
pub use required_state::RequiredState;
pub use state::State;

crate::define_id! {
    /// Unique identifier for a deployment.
    pub struct DeploymentId("dep-");
}
