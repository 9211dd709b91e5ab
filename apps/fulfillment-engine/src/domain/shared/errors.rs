//! Domain errors shared across the fulfillment core.

use std::fmt;

/// Domain-level errors raised by value objects and aggregates.
///
/// These carry no infrastructure detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid value for a field.
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Aggregate invariant violated.
    InvariantViolation {
        /// Aggregate type.
        aggregate: String,
        /// Invariant that was violated.
        invariant: String,
    },
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
            Self::InvariantViolation {
                aggregate,
                invariant,
            } => {
                write!(f, "Invariant violation in {aggregate}: {invariant}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
