//! Physics modules for the coupled plasma simulation.
//!
//! Every module owns a fixed-length state vector and exposes the same
//! capability set through [`PhysicsModule`]: a derivative function of
//! `(t, state, inputs)` and copy-in/copy-out state accessors.
//!
//! Modules:
//! - [`FusionModel`]: 0-D plasma energy balance over `[n, Ti, Te]`
//! - [`FieldOscillatorModel`]: damped, driven field mode over `[E, V]`

pub mod error;
pub mod fusion;
pub mod inputs;
pub mod module;
pub mod oscillator;

pub use error::{PhysicsError, PhysicsResult};
pub use fusion::{FusionModel, FusionParams};
pub use inputs::{InputMap, keys};
pub use module::PhysicsModule;
pub use oscillator::{FieldOscillatorModel, OscillatorParams};
