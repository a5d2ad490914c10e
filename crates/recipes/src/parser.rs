// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Multi-format recipe parsing: TOML, HCL, and JSON all decode into the same
//! [`ComponentRecipe`], mirroring the shape of the reference project's
//! runbook parser, which accepts more than one source syntax for the same
//! declarative model.

use std::path::Path;

use crate::error::RecipeError;
use crate::recipe::ComponentRecipe;

/// Source format of a recipe file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Hcl,
    Json,
}

impl Format {
    /// Infer from a file extension (`.toml`, `.hcl`, `.json`).
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Some(Format::Toml),
            Some("hcl") => Some(Format::Hcl),
            Some("json") => Some(Format::Json),
            _ => None,
        }
    }
}

/// Parse recipe source text in the given format.
pub fn parse_recipe(format: Format, source: &str) -> Result<ComponentRecipe, RecipeError> {
    match format {
        Format::Toml => Ok(toml::from_str(source)?),
        Format::Hcl => Ok(hcl::from_str(source)?),
        Format::Json => Ok(serde_json::from_str(source)?),
    }
}

/// Parse a recipe file, inferring format from its extension.
pub fn parse_recipe_file(path: &Path) -> Result<ComponentRecipe, RecipeError> {
    let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("<unknown>").to_string();
    let format = Format::from_extension(path).ok_or_else(|| RecipeError::UnknownExtension {
        name: name.clone(),
        extension: path.extension().and_then(|e| e.to_str()).unwrap_or("").to_string(),
    })?;
    let source = std::fs::read_to_string(path).map_err(|e| RecipeError::Io { name, source: e })?;
    parse_recipe(format, &source)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
