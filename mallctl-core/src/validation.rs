//! Validation error types

use std::fmt;

use crate::codes;

/// Validation error for goods input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is present but empty
    Empty { field: &'static str },

    /// Field is absent when it is required
    Missing { field: &'static str },

    /// Numeric field is below zero
    Negative { field: &'static str, value: i64 },

    /// Field references a row that does not exist
    UnknownReference { field: &'static str, id: i32 },

    /// Value is not one of the accepted variants
    InvalidVariant { field: &'static str, value: String },
}

impl ValidationError {
    /// Response code reported to the admin UI.
    ///
    /// Shape problems are "bad argument"; well-formed values that point at
    /// nothing (or outside an accepted set) are "bad argument value".
    pub fn errno(&self) -> i32 {
        match self {
            Self::Empty { .. } | Self::Missing { .. } | Self::Negative { .. } => {
                codes::BAD_ARGUMENT
            }
            Self::UnknownReference { .. } | Self::InvalidVariant { .. } => {
                codes::BAD_ARGUMENT_VALUE
            }
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::Missing { field }
            | Self::Negative { field, .. }
            | Self::UnknownReference { field, .. }
            | Self::InvalidVariant { field, .. } => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::Missing { field } => write!(f, "{} is required", field),
            Self::Negative { field, value } => {
                write!(f, "{} must not be negative (got {})", field, value)
            }
            Self::UnknownReference { field, id } => {
                write!(f, "{} {} does not exist", field, id)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Require a non-empty string field.
pub(crate) fn require_text(
    value: Option<&str>,
    field: &'static str,
) -> Result<(), ValidationError> {
    match value {
        None => Err(ValidationError::Missing { field }),
        Some(s) if s.is_empty() => Err(ValidationError::Empty { field }),
        Some(_) => Ok(()),
    }
}
