//! Error types for physics modules.

use thiserror::Error;

/// Errors produced by physics modules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("State shape mismatch for {module}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        module: String,
        expected: usize,
        actual: usize,
    },
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;

impl From<fc_core::CoreError> for PhysicsError {
    fn from(e: fc_core::CoreError) -> Self {
        match e {
            fc_core::CoreError::InvalidArg { what } | fc_core::CoreError::NonFinite { what, .. } => {
                PhysicsError::InvalidArg { what }
            }
        }
    }
}
