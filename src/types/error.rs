//! Error types for the sales analytics pipeline
//!
//! Errors fall into two families with different propagation rules:
//!
//! - [`SalesError`]: run-level failures. File access and computation errors
//!   abort the run; network errors are logged and degrade enrichment.
//! - [`ValidationError`]: per-record failures. The record is dropped and
//!   counted, and processing continues with the next line.

use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

/// Run-level error for the pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SalesError {
    /// A path could not be opened, read, created or written
    ///
    /// Fatal: the run stops.
    #[error("File access error on '{path}': {message}")]
    FileAccess {
        /// The offending path
        path: String,
        /// Underlying I/O error description
        message: String,
    },

    /// The product catalog could not be fetched or decoded
    ///
    /// Non-fatal: every transaction is left unmatched.
    #[error("Network error: {message}")]
    Network {
        /// Description of the failure (connection, status, body)
        message: String,
    },

    /// Aggregates could not be computed
    ///
    /// Raised for an empty validated set or arithmetic overflow. Fatal.
    #[error("Computation error: {message}")]
    Computation {
        /// Description of what could not be computed
        message: String,
    },
}

impl SalesError {
    /// Create a FileAccess error for `path`
    pub fn file_access(path: &Path, cause: impl Display) -> Self {
        SalesError::FileAccess {
            path: path.display().to_string(),
            message: cause.to_string(),
        }
    }

    /// Create a Network error
    pub fn network(message: impl Into<String>) -> Self {
        SalesError::Network {
            message: message.into(),
        }
    }

    /// Create a Computation error
    pub fn computation(message: impl Into<String>) -> Self {
        SalesError::Computation {
            message: message.into(),
        }
    }

    /// Whether the pipeline must stop on this error
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SalesError::Network { .. })
    }
}

/// Reason a single input record was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Line did not split into a known layout
    #[error("expected 8 or 9 fields, found {found}")]
    FieldCount {
        /// Number of `|`-separated fields on the line
        found: usize,
    },

    /// Required field empty after cleaning
    #[error("missing {field}")]
    MissingField {
        /// Column name
        field: &'static str,
    },

    /// Numeric field did not parse
    #[error("invalid {field} '{value}'")]
    InvalidNumber {
        /// Column name
        field: &'static str,
        /// Cleaned raw value
        value: String,
    },

    /// Numeric field parsed but is zero or negative
    #[error("{field} must be positive, got '{value}'")]
    NonPositive {
        /// Column name
        field: &'static str,
        /// Cleaned raw value
        value: String,
    },

    /// Date field is not `YYYY-MM-DD`
    #[error("invalid date '{value}'")]
    InvalidDate {
        /// Raw date text
        value: String,
    },

    /// Identifier lacks its expected prefix
    #[error("{field} '{value}' must start with '{prefix}'")]
    InvalidIdentifier {
        /// Column name
        field: &'static str,
        /// Identifier as read
        value: String,
        /// Required leading character
        prefix: char,
    },

    /// quantity × unit_price does not fit in a Decimal
    #[error("amount overflow for quantity {quantity}")]
    AmountOverflow {
        /// Quantity that overflowed the multiplication
        quantity: u32,
    },
}
