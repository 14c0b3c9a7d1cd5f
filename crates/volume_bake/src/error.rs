//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid regions and configuration, field query failures, destination format and buffer
//! size mismatches, unknown bake targets, IO, and generic errors.
use thiserror::Error;

use crate::encode::OutputFormat;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("field '{field}' unavailable or returned no samples")]
    FieldUnavailable { field: String },

    #[error("format mismatch: encoded for {expected}, destination is {actual}")]
    FormatMismatch {
        expected: OutputFormat,
        actual: OutputFormat,
    },

    #[error("size mismatch: expected {expected} cells, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("unknown bake target {id}")]
    UnknownTarget { id: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

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
