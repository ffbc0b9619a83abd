//! Fixed-step time integration for coupled ODE systems.
//!
//! Provides:
//! - `TransientModel` trait for pluggable dynamic systems
//! - Classical RK4 and forward Euler integrators
//! - Lazy, restartable trajectories over a fixed time grid
//! - A small runner collecting trajectories into records

pub mod error;
pub mod integrator;
pub mod model;
pub mod sim;
pub mod trajectory;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator, IntegratorType, RK4, rk4_step};
pub use model::{FnModel, TransientModel};
pub use sim::{SimOptions, SimRecord, run_sim};
pub use trajectory::{Trajectory, integrate};
