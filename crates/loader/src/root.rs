// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Root directory resolution, mirroring `hearth-daemon`'s own `--root` /
//! `ROOT` precedence (spec §6) so the loader and `hearthd` agree on where
//! `alts/` lives without the loader depending on the daemon crate.

use std::path::PathBuf;

pub fn resolve(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os("ROOT").map(PathBuf::from))
        .unwrap_or_else(|| dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("/var/lib")).join("hearth"))
}

#[cfg(test)]
#[path = "root_tests.rs"]
mod tests;
