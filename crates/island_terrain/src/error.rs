//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, catalog constraints, buffer size mismatches, and missing
//! upstream task inputs.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("terrain catalog has no terrain types")]
    EmptyCatalog,

    #[error("terrain types '{first}' and '{second}' share starting height {height}")]
    DuplicateStartingHeight {
        first: String,
        second: String,
        height: f32,
    },

    #[error("terrain type '{id}' is defined more than once")]
    DuplicateTerrainType { id: String },

    #[error("unknown terrain type '{id}'")]
    UnknownTerrainType { id: String },

    #[error("{context}: expected {expected} samples, got {actual}")]
    ResolutionMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("task '{task}' is missing input '{input}'")]
    MissingInput { task: String, input: String },

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
