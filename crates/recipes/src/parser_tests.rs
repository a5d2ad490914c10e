// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

use super::*;

const TOML_RECIPE: &str = r#"
name = "web"
version = "1.0.0"
dependencies = ["db:RUNNING"]

[lifecycle.run]
script = "sleep 0.1; echo ok"
timeout = 30
"#;

const JSON_RECIPE: &str = r#"{
    "name": "web",
    "version": "1.0.0",
    "dependencies": ["db:RUNNING"]
}"#;

const HCL_RECIPE: &str = r#"
name = "web"
version = "1.0.0"
dependencies = ["db:RUNNING"]
"#;

#[test]
fn parses_toml_recipe() {
    let recipe = parse_recipe(Format::Toml, TOML_RECIPE).unwrap();
    assert_eq!(recipe.name, "web");
    assert_eq!(recipe.dependencies, vec!["db:RUNNING".to_string()]);
    assert_eq!(recipe.lifecycle.run.unwrap().script, "sleep 0.1; echo ok");
}

#[test]
fn parses_json_recipe() {
    let recipe = parse_recipe(Format::Json, JSON_RECIPE).unwrap();
    assert_eq!(recipe.name, "web");
    assert_eq!(recipe.version, "1.0.0");
}

#[test]
fn parses_hcl_recipe() {
    let recipe = parse_recipe(Format::Hcl, HCL_RECIPE).unwrap();
    assert_eq!(recipe.name, "web");
}

#[test]
fn format_from_extension_recognizes_known_suffixes() {
    assert_eq!(Format::from_extension(std::path::Path::new("a.toml")), Some(Format::Toml));
    assert_eq!(Format::from_extension(std::path::Path::new("a.hcl")), Some(Format::Hcl));
    assert_eq!(Format::from_extension(std::path::Path::new("a.json")), Some(Format::Json));
    assert_eq!(Format::from_extension(std::path::Path::new("a.yaml")), None);
}

#[test]
fn parse_recipe_file_reads_and_parses_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("web.toml");
    std::fs::write(&path, TOML_RECIPE).unwrap();
    let recipe = parse_recipe_file(&path).unwrap();
    assert_eq!(recipe.name, "web");
}

#[test]
fn parse_recipe_file_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("web.yaml");
    std::fs::write(&path, TOML_RECIPE).unwrap();
    assert!(matches!(parse_recipe_file(&path), Err(RecipeError::UnknownExtension { .. })));
}
