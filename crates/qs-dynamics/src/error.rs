//! Error types for dynamics evaluation.

use qs_core::QsError;
use thiserror::Error;

/// Errors reported by the dynamics evaluator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DynamicsError {
    #[error("Shape mismatch for {what}: expected {expected} entries, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Singular configuration: denominator {denominator:e}")]
    SingularConfiguration { denominator: f64 },

    #[error("Non-finite result at derivative[{index}]: {value}")]
    NonFiniteResult { index: usize, value: f64 },

    #[error("Non-finite input for {what}: {value}")]
    NonFiniteInput { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type DynamicsResult<T> = Result<T, DynamicsError>;

impl From<QsError> for DynamicsError {
    fn from(e: QsError) -> Self {
        match e {
            QsError::LengthMismatch {
                what,
                expected,
                actual,
            } => DynamicsError::ShapeMismatch {
                what,
                expected,
                actual,
            },
            QsError::NonFinite { what, value } => DynamicsError::NonFiniteInput { what, value },
            QsError::InvalidArg { what } => DynamicsError::InvalidArg { what },
        }
    }
}
