//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The line has fewer fields than a record needs.
    #[error("malformed record: expected {expected} comma-separated fields, found {found}")]
    MalformedRecord {
        /// Number of fields a record needs.
        expected: usize,
        /// Number of fields actually present.
        found: usize,
    },

    /// The id field is not a positive integer.
    #[error("invalid id {value:?}: expected a positive integer")]
    InvalidId {
        /// The offending id text.
        value: String,
    },

    /// The text does not name one of the catalog categories.
    #[error("unknown category {value:?}: expected one of Forensic, Law, Programming, Maths, Engineering, Nursing, Commerce")]
    UnknownCategory {
        /// The offending category text.
        value: String,
    },
}

impl CodecError {
    /// Create a malformed record error.
    pub fn malformed(expected: usize, found: usize) -> Self {
        Self::MalformedRecord { expected, found }
    }

    /// Create an invalid id error.
    pub fn invalid_id(value: impl Into<String>) -> Self {
        Self::InvalidId {
            value: value.into(),
        }
    }

    /// Create an unknown category error.
    pub fn unknown_category(value: impl Into<String>) -> Self {
        Self::UnknownCategory {
            value: value.into(),
        }
    }
}
