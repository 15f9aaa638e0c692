//! Error types for simulation operations.

use qs_dynamics::DynamicsError;
use thiserror::Error;

/// Errors encountered during transient simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Dynamics error: {0}")]
    Dynamics(#[from] DynamicsError),
}

pub type SimResult<T> = Result<T, SimError>;
