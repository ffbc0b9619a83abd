//! TransientModel trait for pluggable dynamic systems.

use nalgebra::DVector;

use crate::error::SimResult;

/// Trait for transient (dynamic) system models.
///
/// A TransientModel must implement:
/// - State type (Clone, for snapshots)
/// - Initial state
/// - RHS (right-hand side) computation: x_dot = f(t, x)
/// - Scalar field arithmetic for integration: add states, scale by scalar
pub trait TransientModel {
    /// State type (must be Clone).
    type State: Clone;

    /// Return the initial state at t=0.
    fn initial_state(&self) -> Self::State;

    /// Compute state derivative dxdt = f(t, x).
    ///
    /// Integrators call this several times per step with trial states, so the
    /// result must depend only on `(t, x)` and on state that the model itself
    /// advances deterministically.
    ///
    /// Note: Takes &mut self so coupled models can write the trial state back
    /// into their sub-models before evaluating them.
    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = scale * a.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;
}

/// Adapter turning a plain `f(t, y) -> dy` closure into a [`TransientModel`].
pub struct FnModel<F> {
    y0: DVector<f64>,
    f: F,
}

impl<F> FnModel<F>
where
    F: FnMut(f64, &DVector<f64>) -> DVector<f64>,
{
    pub fn new(y0: DVector<f64>, f: F) -> Self {
        Self { y0, f }
    }
}

impl<F> TransientModel for FnModel<F>
where
    F: FnMut(f64, &DVector<f64>) -> DVector<f64>,
{
    type State = DVector<f64>;

    fn initial_state(&self) -> Self::State {
        self.y0.clone()
    }

    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State> {
        Ok((self.f)(t, x))
    }

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
        a + b
    }

    fn scale(&self, a: &Self::State, scale: f64) -> Self::State {
        a * scale
    }
}
