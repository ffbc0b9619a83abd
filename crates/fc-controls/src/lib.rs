//! Feedback control primitives for fusioncraft.
//!
//! Controllers are split the same way throughout:
//! - an immutable configuration (`PIDController`) with a pure `update`
//! - a plain state record (`PIDControllerState`) that can be inspected and serialized
//! - a stateful loop (`PidLoop`) owning both, for callers that want `step`/`reset`
//!
//! Integral windup is bounded by an optional symmetric clamp on the accumulator.

pub mod controller;
pub mod error;

pub use controller::{PIDController, PIDControllerState, PidLoop};
pub use error::{ControlError, ControlResult};
