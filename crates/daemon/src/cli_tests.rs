// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

use super::*;

#[test]
fn parses_root_and_init_config() {
    let cli = Cli::parse_from(["hearthd", "--root", "/tmp/x", "--init-config", "seed.yaml"]);
    assert_eq!(cli.root, Some(PathBuf::from("/tmp/x")));
    assert_eq!(cli.init_config, Some(PathBuf::from("seed.yaml")));
}

#[test]
fn start_defaults_true() {
    let cli = Cli::parse_from(["hearthd"]);
    assert!(cli.should_start());
}

#[test]
fn start_false_is_honored() {
    let cli = Cli::parse_from(["hearthd", "--start", "false"]);
    assert!(!cli.should_start());
}

#[test]
fn accepts_provisioning_passthrough_flags() {
    let cli = Cli::parse_from([
        "hearthd",
        "--aws-region",
        "us-east-1",
        "--provision",
        "true",
        "--setup-system-service",
        "false",
        "--component-default-user",
        "svc:svc",
    ]);
    assert_eq!(cli.aws_region.as_deref(), Some("us-east-1"));
    assert_eq!(cli.provision, Some(true));
    assert_eq!(cli.setup_system_service, Some(false));
    assert_eq!(cli.component_default_user.as_deref(), Some("svc:svc"));
}
