// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

use super::*;

#[test]
fn build_starts_empty() {
    let registry = build();
    assert!(!registry.contains("anything"));
}
