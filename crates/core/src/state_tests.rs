// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

use super::*;

#[test]
fn display_matches_spec_uppercase_names() {
    assert_eq!(State::New.to_string(), "NEW");
    assert_eq!(State::Running.to_string(), "RUNNING");
    assert_eq!(State::Broken.to_string(), "BROKEN");
}

#[test]
fn happy_states_are_running_and_finished() {
    assert!(State::Running.is_happy());
    assert!(State::Finished.is_happy());
    assert!(!State::Starting.is_happy());
    assert!(!State::Broken.is_happy());
}

#[yare::parameterized(
    new_to_installed = (State::New, State::Installed, true),
    installed_to_starting = (State::Installed, State::Starting, true),
    starting_to_running = (State::Starting, State::Running, true),
    running_to_stopping = (State::Running, State::Stopping, true),
    stopping_to_finished = (State::Stopping, State::Finished, true),
    running_to_errored = (State::Running, State::Errored, true),
    errored_to_broken = (State::Errored, State::Broken, true),
    finished_to_new_is_reconfigure = (State::Finished, State::New, true),
    running_to_installed_is_rejected = (State::Running, State::Installed, false),
    new_to_running_skips_steps = (State::New, State::Running, false),
)]
fn transition_table(case: (State, State, bool)) {
    let (from, to, expected) = case;
    assert_eq!(from.allows(to), expected, "{from} -> {to}");
}
