//! Core error types for memora-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering
//! the failure modes of the pure domain model (card payload validation).

use thiserror::Error;

/// Core errors produced by the memora-core crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A required text field is empty.
    #[error("missing required field: '{field}'")]
    MissingField { field: &'static str },

    /// A card needs at least one entry in a list-valued field.
    #[error("card must have at least one {what}")]
    EmptyEntries { what: &'static str },

    /// A multiple-choice card marks no option as correct.
    #[error("multiple choice card must mark at least one option correct")]
    NoCorrectOption,
}
