//! Error types for feedback law operations.

use qs_core::QsError;
use thiserror::Error;

/// Result type for feedback law operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in feedback law operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A gain or scale coefficient is NaN or infinite.
    #[error("Non-finite {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    /// Least-squares solve failed.
    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

impl From<QsError> for ControlError {
    fn from(e: QsError) -> Self {
        match e {
            QsError::NonFinite { what, value } => ControlError::NonFinite { what, value },
            QsError::InvalidArg { what } => ControlError::InvalidArg { what },
            QsError::LengthMismatch { what, .. } => ControlError::InvalidArg { what },
        }
    }
}
