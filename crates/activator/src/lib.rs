// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hearth-activator: the two deployment-activation strategies (in-place
//! config swap, and staged kernel update via the `alts/` symlink layout
//! and a bootstrap task list), plus the loader's symlink-flip decision
//! table shared between `hearthd` and `hearth-loader`.

pub mod activator;
pub mod bootstrap;
pub mod deployment;
pub mod error;
pub mod layout;
pub mod status;

pub use activator::{DefaultActivator, KernelUpdateActivator, KernelUpdateResult};
pub use bootstrap::{BootstrapOutcome, BootstrapTask};
pub use deployment::{
    ComponentUpdateAction, ComponentUpdatePolicy, Deployment, DeploymentStatus, FailureHandlingPolicy,
    PackageConfiguration, Stage, requires_bootstrap,
};
pub use error::ActivationError;
pub use layout::{
    AltsLayout, LoaderAction, loader_action, promote_new_demoting_current, promote_new_fresh, promote_old_fresh,
};
pub use status::{StatusReport, publish as publish_status};
