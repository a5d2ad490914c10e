// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

use super::*;
use crate::cli::Cli;
use clap::Parser;
use hearth_core::{FakeClock, State};

fn config_for(root: &std::path::Path) -> DaemonConfig {
    let cli = Cli::parse_from(["hearthd", "--root", root.to_str().unwrap()]);
    DaemonConfig::load(&cli)
}

fn write_recipe(dir: &std::path::Path, name: &str, dependencies: &[&str]) {
    std::fs::create_dir_all(dir).unwrap();
    let deps = dependencies.iter().map(|d| format!("\"{d}\"")).collect::<Vec<_>>().join(", ");
    let toml = format!("name = \"{name}\"\nversion = \"1.0.0\"\ndependencies = [{deps}]\n");
    std::fs::write(dir.join(format!("{name}.toml")), toml).unwrap();
}

#[tokio::test]
async fn boot_with_no_recipes_starts_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let daemon_config = config_for(tmp.path());
    let outcome = boot_with_clock(daemon_config, FakeClock::new()).await.unwrap();
    assert!(matches!(outcome, StartupOutcome::Running(_)));
}

#[tokio::test]
async fn boot_locates_and_starts_recipes_in_dependency_order() {
    let tmp = tempfile::tempdir().unwrap();
    let daemon_config = config_for(tmp.path());
    write_recipe(&daemon_config.recipes_dir(), "base", &[]);
    write_recipe(&daemon_config.recipes_dir(), "dependent", &["base"]);

    let outcome = boot_with_clock(daemon_config, FakeClock::new()).await.unwrap();
    let StartupOutcome::Running(daemon) = outcome else { panic!("expected Running") };

    assert_eq!(daemon.supervisor.state_of("base"), Some(State::Running));
    assert_eq!(daemon.supervisor.state_of("dependent"), Some(State::Running));
}

#[tokio::test]
async fn boot_replays_prior_tlog_before_starting() {
    let tmp = tempfile::tempdir().unwrap();
    let daemon_config = config_for(tmp.path());
    daemon_config.ensure_layout().unwrap();
    std::fs::write(daemon_config.tlog_path(), "5\ts\tfoo/bar\t\"baz\"\n").unwrap();

    let outcome = boot_with_clock(daemon_config, FakeClock::new()).await.unwrap();
    let StartupOutcome::Running(daemon) = outcome else { panic!("expected Running") };

    let value = daemon.config.find(&hearth_core::NodePath::new(["foo", "bar"])).unwrap();
    assert_eq!(value.value, Some(serde_json::json!("baz")));
}

#[tokio::test]
async fn boot_mirrors_new_mutations_into_tlog() {
    let tmp = tempfile::tempdir().unwrap();
    let daemon_config = config_for(tmp.path());
    let outcome = boot_with_clock(daemon_config.clone(), FakeClock::new()).await.unwrap();
    let StartupOutcome::Running(daemon) = outcome else { panic!("expected Running") };

    daemon.config.set_value(&hearth_core::NodePath::new(["a", "b"]), serde_json::json!(1), 10, false);
    daemon.config.publish_queue().drain();

    let contents = std::fs::read_to_string(daemon_config.tlog_path()).unwrap();
    assert!(contents.contains("a/b"));
}

#[test]
fn load_recipes_ignores_files_with_unknown_extensions() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("notes.txt"), "not a recipe").unwrap();
    write_recipe(tmp.path(), "svc", &[]);

    let recipes = load_recipes(tmp.path()).unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].name, "svc");
}

#[test]
fn load_recipes_on_missing_directory_is_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("does-not-exist");
    assert!(load_recipes(&missing).unwrap().is_empty());
}
