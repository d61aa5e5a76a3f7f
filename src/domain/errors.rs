//! Validation errors raised while constructing telemetry events

use std::fmt::Display;
use thiserror::Error;

/// A field of a telemetry event failed validation
///
/// Raised when an identifier is empty or a delay/duration is not positive.
/// Always fatal to the run that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Adapter for `map_err` over nutype validation errors
    pub fn for_field<E: Display>(field: &'static str) -> impl FnOnce(E) -> Self {
        move |err| Self::new(field, err.to_string())
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
