//! Error types for query parameter parsing.

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use crate::method::Method;

/// Errors raised while parsing query parameters.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Malformed filter key, or a reserved key with the wrong number of values.
    #[error("bad format: {0}")]
    BadFormat(String),

    /// The field is not present in the validation table.
    #[error("filter not allowed: {0}")]
    FilterNotAllowed(String),

    /// The method cannot be applied to the field's declared type.
    #[error("method {method} not allowed for {key}")]
    MethodNotAllowed { key: String, method: Method },

    /// Value could not be converted to an integer.
    #[error("{key}: invalid integer")]
    InvalidInt {
        key: String,
        #[source]
        source: ParseIntError,
    },

    /// Value could not be converted to a float.
    #[error("{key}: invalid float")]
    InvalidFloat {
        key: String,
        #[source]
        source: ParseFloatError,
    },

    /// Value could not be converted to a boolean.
    #[error("{key}: invalid boolean {value:?}")]
    InvalidBool { key: String, value: String },

    /// A validator rejected the value.
    #[error("{key}: {message}")]
    Validation { key: String, message: String },

    /// Unknown type suffix in a validation table key.
    #[error("unknown value type: {0}")]
    UnknownType(String),
}

impl QueryError {
    /// Returns the query key this error refers to, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MethodNotAllowed { key, .. }
            | Self::InvalidInt { key, .. }
            | Self::InvalidFloat { key, .. }
            | Self::InvalidBool { key, .. }
            | Self::Validation { key, .. } => Some(key.as_str()),
            Self::FilterNotAllowed(name) => Some(name.as_str()),
            Self::BadFormat(_) | Self::UnknownType(_) => None,
        }
    }
}

/// Result type alias for query parsing operations.
pub type Result<T> = std::result::Result<T, QueryError>;
