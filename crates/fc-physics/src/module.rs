//! Capability set shared by all physics modules.

use crate::error::{PhysicsError, PhysicsResult};
use crate::inputs::InputMap;

/// A physics module owning a fixed-length state vector.
///
/// The state length and label order never change after construction.
pub trait PhysicsModule {
    /// Module name for debugging and identification.
    fn name(&self) -> &str;

    /// Labels of the state entries, in storage order.
    fn state_labels(&self) -> &'static [&'static str];

    /// Fixed state length.
    fn state_len(&self) -> usize {
        self.state_labels().len()
    }

    /// Time derivative of `state` given external `inputs`.
    ///
    /// Evaluates the supplied state, not the stored one, and never mutates the
    /// module. Unknown input keys are ignored.
    fn derivative(&self, t: f64, state: &[f64], inputs: &InputMap) -> PhysicsResult<Vec<f64>>;

    /// Copy of the stored state.
    fn get_state(&self) -> Vec<f64>;

    /// Replace the stored state with a copy of `state`.
    ///
    /// Fails with [`PhysicsError::ShapeMismatch`] if the length differs from
    /// [`PhysicsModule::state_len`].
    fn set_state(&mut self, state: &[f64]) -> PhysicsResult<()>;
}

/// Check that `state` has the length a module expects.
pub(crate) fn check_shape(module: &str, expected: usize, state: &[f64]) -> PhysicsResult<()> {
    if state.len() == expected {
        Ok(())
    } else {
        Err(PhysicsError::ShapeMismatch {
            module: module.to_string(),
            expected,
            actual: state.len(),
        })
    }
}
