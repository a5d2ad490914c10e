// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Environment variables the daemon consumes directly (spec §6).
//!
//! Proxy variables and `SVCUID` are not acted on here — they are read once
//! at startup and threaded into every lifecycle phase's environment so
//! external-script components inherit them, matching how the reference
//! daemon centralizes `OJ_*` lookups in one module instead of scattering
//! `std::env::var` calls through the codebase.

use std::collections::HashMap;
use std::path::PathBuf;

/// `ROOT`: the daemon's working root. Falls back to the platform's
/// standard state directory when unset, the same precedence shape the
/// reference daemon's `state_dir()` uses for `OJ_STATE_DIR`.
pub fn root_from_env() -> Option<PathBuf> {
    std::env::var_os("ROOT").map(PathBuf::from)
}

pub fn default_root() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("/var/lib")).join("hearth")
}

/// `LOG_STORE`: `FILE` (default) or `CONSOLE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStore {
    File,
    Console,
}

pub fn log_store() -> LogStore {
    match std::env::var("LOG_STORE").as_deref() {
        Ok("CONSOLE") => LogStore::Console,
        _ => LogStore::File,
    }
}

/// The proxy environment variables the spec says are consumed (passed
/// through to child process environments, both upper and lower case).
const PROXY_VARS: &[&str] = &["HTTP_PROXY", "HTTPS_PROXY", "NO_PROXY", "http_proxy", "https_proxy", "no_proxy"];

/// Collect whichever proxy variables are set in this process's environment,
/// for injection into every lifecycle phase's [`hearth_adapters::PhaseContext::env`].
pub fn proxy_env() -> HashMap<String, String> {
    PROXY_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok().map(|value| (name.to_string(), value)))
        .collect()
}

/// `SVCUID`: passed to child processes for IPC auth with the (out-of-scope)
/// IPC server. The daemon itself does not validate it — it is purely
/// forwarded into the phase environment the same way proxy variables are.
pub fn svcuid() -> Option<String> {
    std::env::var("SVCUID").ok()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
