// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hearth-adapters: the explicit Context/DI registry and the
//! [`adapter::ServiceAdapter`] abstraction the Lifecycle uses to run a
//! component's install/startup/run/shutdown/recover phases, whether that
//! component is a recipe's shell scripts or a Rust-native service registered
//! at build time.

pub mod adapter;
pub mod context;

pub use adapter::{
    AdapterError, CodeBackedAdapter, CodeBackedService, ExternalScriptAdapter, Phase, PhaseContext, PhaseOutcome,
    ServiceAdapter, ServiceRegistry,
};
pub use context::{Component, Context};
