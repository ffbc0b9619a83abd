//! Damped, driven oscillator for a single electromagnetic field mode.
//!
//! ```text
//! dE/dt = V
//! dV/dt = -gamma * V - omega^2 * E + drive
//! ```

use fc_core::ensure_finite;
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, PhysicsResult};
use crate::inputs::{InputMap, keys};
use crate::module::{PhysicsModule, check_shape};

const LABELS: &[&str] = &["E", "V"];

/// Parameters of the field oscillator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillatorParams {
    /// Angular frequency (rad/s).
    pub omega: f64,
    /// Damping rate (1/s).
    pub gamma: f64,
    /// Initial field amplitude.
    pub initial_field: f64,
    /// Initial field rate of change.
    pub initial_rate: f64,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            omega: 5.0,
            gamma: 0.1,
            initial_field: 0.0,
            initial_rate: 0.0,
        }
    }
}

impl OscillatorParams {
    pub fn validate(&self) -> PhysicsResult<()> {
        let omega = ensure_finite(self.omega, "omega must be finite")?;
        let gamma = ensure_finite(self.gamma, "gamma must be finite")?;
        if omega < 0.0 {
            return Err(PhysicsError::InvalidArg {
                what: "omega must be non-negative",
            });
        }
        if gamma < 0.0 {
            return Err(PhysicsError::InvalidArg {
                what: "gamma must be non-negative",
            });
        }
        ensure_finite(self.initial_field, "initial_field must be finite")?;
        ensure_finite(self.initial_rate, "initial_rate must be finite")?;
        Ok(())
    }
}

/// Field oscillator module with state `[E, V]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOscillatorModel {
    params: OscillatorParams,
    state: [f64; 2],
}

impl FieldOscillatorModel {
    pub fn new(params: OscillatorParams) -> PhysicsResult<Self> {
        params.validate()?;
        let state = [params.initial_field, params.initial_rate];
        Ok(Self { params, state })
    }

    pub fn params(&self) -> &OscillatorParams {
        &self.params
    }

    pub fn field(&self) -> f64 {
        self.state[0]
    }

    pub fn field_rate(&self) -> f64 {
        self.state[1]
    }

    /// Oscillator energy `0.5 * (V^2 + omega^2 * E^2)` of an arbitrary state.
    pub fn energy_of(&self, e: f64, v: f64) -> f64 {
        let omega = self.params.omega;
        0.5 * (v * v + omega * omega * e * e)
    }

    /// Energy of the stored state.
    pub fn energy(&self) -> f64 {
        self.energy_of(self.state[0], self.state[1])
    }
}

impl PhysicsModule for FieldOscillatorModel {
    fn name(&self) -> &str {
        "field_oscillator"
    }

    fn state_labels(&self) -> &'static [&'static str] {
        LABELS
    }

    fn derivative(&self, _t: f64, state: &[f64], inputs: &InputMap) -> PhysicsResult<Vec<f64>> {
        check_shape(self.name(), LABELS.len(), state)?;
        let (e, v) = (state[0], state[1]);
        let omega = self.params.omega;
        let drive = inputs.get(keys::EM_DRIVE);
        Ok(vec![v, -self.params.gamma * v - omega * omega * e + drive])
    }

    fn get_state(&self) -> Vec<f64> {
        self.state.to_vec()
    }

    fn set_state(&mut self, state: &[f64]) -> PhysicsResult<()> {
        check_shape(self.name(), LABELS.len(), state)?;
        self.state.copy_from_slice(state);
        Ok(())
    }
}
