// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("hcl parse error: {0}")]
    Hcl(#[from] hcl::Error),

    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("recipe {name}: malformed dependency spec {spec:?}")]
    MalformedDependency { name: String, spec: String },

    #[error("recipe {name}: unknown file extension {extension:?}, expected one of toml/hcl/json")]
    UnknownExtension { name: String, extension: String },

    #[error("recipe {name}: failed to read file: {source}")]
    Io { name: String, source: std::io::Error },
}
