//! The module contains the errors the engine can return.
//!
//! - [`Validation`] when the input breaks one or more field constraints. It is
//!   raised before the database is touched.
//! - [`Database`] for any failure coming from the store.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`Database`]: EngineError::Database
use std::fmt;

use sea_orm::DbErr;
use thiserror::Error;

/// A constraint broken by a single input field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {}", join(.0))]
    Validation(Vec<FieldViolation>),
    #[error(transparent)]
    Database(#[from] DbErr),
}

fn join(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
