// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Build-time registration point for code-backed services (spec §9's
//! registry-over-classpath-scanning replacement). No component ships with a
//! Rust-native adapter today, so this starts empty; a future service that
//! wants to skip [`hearth_adapters::ExternalScriptAdapter`] registers itself
//! here with its recipe name, the same way the reference daemon wires
//! annotation-discovered services into its own registry at startup.
use hearth_adapters::ServiceRegistry;

pub fn build() -> ServiceRegistry {
    ServiceRegistry::new()
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
