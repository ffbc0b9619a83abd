//! Coupled plasma/field/controller simulation engine.
//!
//! This crate wires the physics modules, the PID loop and the fixed-step
//! integrator into one coupled system and exposes a single entry point,
//! [`run_simulation`], returning every recorded quantity as a [`TimeSeries`].
//!
//! # Pipeline
//!
//! 1. [`SimConfig`] holds every parameter (YAML-loadable)
//! 2. [`StateComposer`] packs module states into one combined vector and back
//! 3. [`CoupledPlant`] evaluates the coupled derivative at each integrator stage
//! 4. [`Simulation`] drives the integrator over the time grid and records series

pub mod composer;
pub mod config;
pub mod coupled;
pub mod driver;
pub mod error;

pub use composer::{ModuleSlot, StateComposer};
pub use config::{ControlUpdate, ControllerConfig, CouplingConfig, SimConfig};
pub use coupled::{CoupledPlant, coupled_derivative};
pub use driver::{SERIES, SimPhase, Simulation, run_simulation, run_simulation_with};
pub use error::{AppError, AppResult};
pub use fc_results::TimeSeries;
