// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Validator contract.
//!
//! `(newValue, oldValue) -> acceptedValue`. A validator may coerce (clamp a
//! number to a range) or veto by returning `oldValue`. Any error returned
//! from a validator is always treated as a veto, and logged, rather than
//! left to depend on the particular validator's own error-handling.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("validator rejected value: {0}")]
pub struct ValidatorError(pub String);

/// `(new_value, old_value) -> accepted_value`.
///
/// Validators must be pure and fast: they run synchronously as
/// part of `ConfigTree::set_value`, so any I/O or long computation here
/// causes head-of-line blocking across all services.
pub trait Validator: Send + Sync {
    fn validate(&self, new_value: &Value, old_value: &Value) -> Result<Value, ValidatorError>;
}

pub type ValidatorFn = Box<dyn Validator>;

impl<F> Validator for F
where
    F: Fn(&Value, &Value) -> Result<Value, ValidatorError> + Send + Sync,
{
    fn validate(&self, new_value: &Value, old_value: &Value) -> Result<Value, ValidatorError> {
        self(new_value, old_value)
    }
}

/// Apply a validator, treating any error as a veto of the new value.
pub(crate) fn apply(validator: &dyn Validator, new_value: &Value, old_value: &Value) -> Value {
    match validator.validate(new_value, old_value) {
        Ok(accepted) => accepted,
        Err(err) => {
            tracing::warn!(error = %err, "validator vetoed value, keeping prior value");
            old_value.clone()
        }
    }
}
