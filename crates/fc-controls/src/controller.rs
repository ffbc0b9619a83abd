//! PID controller.
//!
//! The controller computes
//!
//! ```text
//! e        = sp - pv
//! integral = clamp(integral + e * dt, -limit, limit)
//! d        = (e - e_prev) / dt        (0 on the first call or when dt <= 0)
//! u        = kp * e + ki * integral + kd * d
//! ```
//!
//! and optionally clamps `u` to a symmetric output limit.

use fc_core::ensure_finite;
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// PID controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PIDController {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    pub ki: f64,
    /// Derivative gain.
    pub kd: f64,
    /// Symmetric bound on the integral accumulator (anti-windup).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integral_limit: Option<f64>,
    /// Symmetric bound on the controller output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_limit: Option<f64>,
}

impl PIDController {
    /// Create a new PID controller with unbounded integral and output.
    ///
    /// # Arguments
    ///
    /// * `kp` - Proportional gain
    /// * `ki` - Integral gain
    /// * `kd` - Derivative gain
    pub fn new(kp: f64, ki: f64, kd: f64) -> ControlResult<Self> {
        ensure_finite(kp, "kp must be finite")?;
        ensure_finite(ki, "ki must be finite")?;
        ensure_finite(kd, "kd must be finite")?;
        Ok(Self {
            kp,
            ki,
            kd,
            integral_limit: None,
            output_limit: None,
        })
    }

    /// Set integral windup limit.
    pub fn with_integral_limit(mut self, limit: f64) -> ControlResult<Self> {
        if !(limit.is_finite() && limit > 0.0) {
            return Err(ControlError::InvalidArg {
                what: "integral_limit must be finite and positive",
            });
        }
        self.integral_limit = Some(limit);
        Ok(self)
    }

    /// Set symmetric output limit.
    pub fn with_output_limit(mut self, limit: f64) -> ControlResult<Self> {
        if !(limit.is_finite() && limit > 0.0) {
            return Err(ControlError::InvalidArg {
                what: "output_limit must be finite and positive",
            });
        }
        self.output_limit = Some(limit);
        Ok(self)
    }

    /// Compute controller output.
    ///
    /// # Arguments
    ///
    /// * `state` - Controller state before this update
    /// * `pv` - Process variable (measured value)
    /// * `sp` - Setpoint (desired value)
    /// * `dt` - Time since last update (seconds); `dt <= 0` disables the
    ///   derivative term instead of failing
    ///
    /// # Returns
    ///
    /// Updated state and output value.
    pub fn update(
        &self,
        state: &PIDControllerState,
        pv: f64,
        sp: f64,
        dt: f64,
    ) -> (PIDControllerState, f64) {
        // Error: e = sp - pv (positive error means PV is below setpoint)
        let error = sp - pv;

        let p_term = self.kp * error;

        let new_integral = state.integral + error * dt;
        let integral = match self.integral_limit {
            Some(limit) => new_integral.clamp(-limit, limit),
            None => new_integral,
        };
        let i_term = self.ki * integral;

        let derivative = match state.previous_error {
            Some(prev) if dt > 0.0 => (error - prev) / dt,
            _ => 0.0,
        };
        let d_term = self.kd * derivative;

        let output_raw = p_term + i_term + d_term;
        let output = match self.output_limit {
            Some(limit) => output_raw.clamp(-limit, limit),
            None => output_raw,
        };

        let new_state = PIDControllerState {
            integral,
            previous_error: Some(error),
        };

        (new_state, output)
    }
}

/// PID controller state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PIDControllerState {
    /// Integral accumulator.
    pub integral: f64,
    /// Error seen on the previous update; `None` until the first update.
    pub previous_error: Option<f64>,
}

/// A PID controller together with the state it advances.
///
/// Each `step` mutates the owned state, so one loop must not be shared between
/// independent simulations.
#[derive(Debug, Clone, PartialEq)]
pub struct PidLoop {
    controller: PIDController,
    state: PIDControllerState,
    last_output: f64,
    updates: u64,
}

impl PidLoop {
    pub fn new(controller: PIDController) -> Self {
        Self {
            controller,
            state: PIDControllerState::default(),
            last_output: 0.0,
            updates: 0,
        }
    }

    /// Advance the controller by one update and return the control signal.
    pub fn step(&mut self, setpoint: f64, measured: f64, dt: f64) -> f64 {
        let (state, output) = self.controller.update(&self.state, measured, setpoint, dt);
        self.state = state;
        self.last_output = output;
        self.updates += 1;
        output
    }

    /// Clear the integral and previous error back to their initial values.
    pub fn reset(&mut self) {
        self.state = PIDControllerState::default();
        self.last_output = 0.0;
        self.updates = 0;
    }

    pub fn controller(&self) -> &PIDController {
        &self.controller
    }

    pub fn state(&self) -> &PIDControllerState {
        &self.state
    }

    /// Output of the most recent `step` (0 before the first one).
    pub fn last_output(&self) -> f64 {
        self.last_output
    }

    /// Number of `step` calls since construction or the last reset.
    pub fn updates(&self) -> u64 {
        self.updates
    }
}
