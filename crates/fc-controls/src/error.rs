//! Error types for control system operations.

use thiserror::Error;

/// Result type for control system operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in control system operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl From<fc_core::CoreError> for ControlError {
    fn from(e: fc_core::CoreError) -> Self {
        match e {
            fc_core::CoreError::InvalidArg { what } | fc_core::CoreError::NonFinite { what, .. } => {
                ControlError::InvalidArg { what }
            }
        }
    }
}
