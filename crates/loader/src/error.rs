// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Activation(#[from] hearth_activator::ActivationError),

    #[error("`{path}` has no executable hearthd binary")]
    MissingBinary { path: String },
}
