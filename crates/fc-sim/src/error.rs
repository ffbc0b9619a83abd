//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered during transient simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Model error: {message}")]
    Model { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<fc_core::CoreError> for SimError {
    fn from(e: fc_core::CoreError) -> Self {
        match e {
            fc_core::CoreError::InvalidArg { what } => SimError::InvalidArg { what },
            other => SimError::Model {
                message: other.to_string(),
            },
        }
    }
}
