//! Error types for the fc-app engine layer.

use std::path::PathBuf;

/// Application error type wrapping the backend crates' errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: &'static str },

    #[error("Failed to parse configuration: {0}")]
    Config(String),

    #[error("Failed to read configuration file: {}", path.display())]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("State layout error: {what}")]
    Layout { what: String },

    #[error("Simulation cannot run from phase {phase}")]
    InvalidPhase { phase: &'static str },

    #[error("Physics error: {0}")]
    Physics(#[from] fc_physics::PhysicsError),

    #[error("Control error: {0}")]
    Control(#[from] fc_controls::ControlError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] fc_sim::SimError),

    #[error("Results error: {0}")]
    Results(#[from] fc_results::ResultsError),
}

/// Result type for fc-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<fc_core::CoreError> for AppError {
    fn from(err: fc_core::CoreError) -> Self {
        match err {
            fc_core::CoreError::InvalidArg { what } | fc_core::CoreError::NonFinite { what, .. } => {
                AppError::InvalidConfig { what }
            }
        }
    }
}
