//! Zero-dimensional plasma energy balance.
//!
//! State `[n, Ti, Te]`: density, ion temperature, electron temperature, in
//! normalized units. The rate terms are deliberately simple:
//!
//! ```text
//! <sv>(Ti) = sv_peak * x^2 / (1 + x^2),  x = Ti / T_peak
//! P_fus    = E_fus * n^2 / 4 * <sv>
//! P_rad    = c_rad * n^2 * sqrt(Te)
//! tau_E    = max(tau_0 * (1 + g_B * B), tau_min)
//! P_ei     = c_ei * n^2 * (Te - Ti) / Te^1.5
//!
//! dn/dt  = S_fuel - n^2 <sv> / 2 - n / tau_p
//! dTi/dt = (f_i P_heat + f_ai P_alpha + P_ei) / (1.5 n) - Ti / tau_E + g_i u
//! dTe/dt = ((1 - f_i) P_heat + (1 - f_ai) P_alpha - P_ei - P_rad) / (1.5 n) - Te / tau_E + g_e u
//! ```
//!
//! Every read of `n`, `Ti` and `Te` inside the derivative is floored at
//! `floor`, and every denominator is bounded away from zero. The stored state
//! is never touched by the derivative.

use fc_core::{ensure_finite, ensure_positive, floor_positive, safe_div};
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, PhysicsResult};
use crate::inputs::{InputMap, keys};
use crate::module::{PhysicsModule, check_shape};

const LABELS: &[&str] = &["n", "Ti", "Te"];

/// Parameters of the fusion plasma model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionParams {
    /// Initial density.
    pub initial_density: f64,
    /// Initial ion temperature (keV).
    pub initial_ion_temperature: f64,
    /// Initial electron temperature (keV).
    pub initial_electron_temperature: f64,

    /// Energy released per reaction.
    pub fusion_energy: f64,
    /// Asymptotic reactivity at high temperature.
    pub reactivity_peak: f64,
    /// Temperature at which reactivity reaches half of its peak (keV).
    pub reactivity_peak_temperature: f64,
    /// Fraction of fusion power carried by charged products.
    pub alpha_fraction: f64,
    /// Share of alpha heating deposited on ions.
    pub alpha_ion_fraction: f64,

    /// Bremsstrahlung-like loss coefficient.
    pub radiation_coefficient: f64,
    /// Ion-electron energy exchange coefficient.
    pub equilibration_coefficient: f64,

    /// Base energy confinement time (s).
    pub confinement_time: f64,
    /// Confining field strength.
    pub field_strength: f64,
    /// Relative confinement gain per unit field strength.
    pub field_confinement_gain: f64,
    /// Lower bound on any confinement time (s).
    pub min_confinement_time: f64,
    /// Particle confinement time (s).
    pub particle_confinement_time: f64,

    /// External heating power.
    pub heating_power: f64,
    /// Share of external heating deposited on ions.
    pub ion_heating_fraction: f64,
    /// Baseline fuel injection rate.
    pub fueling_rate: f64,

    /// dTi/dt contributed per unit of control signal.
    pub ion_control_gain: f64,
    /// dTe/dt contributed per unit of control signal.
    pub electron_control_gain: f64,

    /// Floor applied to density and temperatures inside the derivative.
    pub floor: f64,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self {
            initial_density: 1.0,
            initial_ion_temperature: 2.0,
            initial_electron_temperature: 2.0,
            fusion_energy: 17.6,
            reactivity_peak: 1.0,
            reactivity_peak_temperature: 20.0,
            alpha_fraction: 0.2,
            alpha_ion_fraction: 0.5,
            radiation_coefficient: 0.01,
            equilibration_coefficient: 0.1,
            confinement_time: 1.0,
            field_strength: 1.0,
            field_confinement_gain: 0.5,
            min_confinement_time: 1e-3,
            particle_confinement_time: 3.0,
            heating_power: 6.0,
            ion_heating_fraction: 0.5,
            fueling_rate: 0.34,
            ion_control_gain: 1.0,
            electron_control_gain: 0.5,
            floor: fc_core::PHYSICAL_FLOOR,
        }
    }
}

fn ensure_fraction(v: f64, what: &'static str) -> PhysicsResult<f64> {
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(PhysicsError::InvalidArg { what })
    }
}

fn ensure_non_negative(v: f64, what: &'static str) -> PhysicsResult<f64> {
    let v = ensure_finite(v, what)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(PhysicsError::InvalidArg { what })
    }
}

impl FusionParams {
    /// Check that all parameters are physically meaningful.
    pub fn validate(&self) -> PhysicsResult<()> {
        ensure_finite(self.initial_density, "initial_density must be finite")?;
        ensure_finite(
            self.initial_ion_temperature,
            "initial_ion_temperature must be finite",
        )?;
        ensure_finite(
            self.initial_electron_temperature,
            "initial_electron_temperature must be finite",
        )?;
        ensure_non_negative(self.fusion_energy, "fusion_energy must be non-negative")?;
        ensure_non_negative(self.reactivity_peak, "reactivity_peak must be non-negative")?;
        ensure_positive(
            self.reactivity_peak_temperature,
            "reactivity_peak_temperature must be positive",
        )?;
        ensure_fraction(self.alpha_fraction, "alpha_fraction must be in [0, 1]")?;
        ensure_fraction(self.alpha_ion_fraction, "alpha_ion_fraction must be in [0, 1]")?;
        ensure_non_negative(
            self.radiation_coefficient,
            "radiation_coefficient must be non-negative",
        )?;
        ensure_non_negative(
            self.equilibration_coefficient,
            "equilibration_coefficient must be non-negative",
        )?;
        ensure_positive(self.confinement_time, "confinement_time must be positive")?;
        ensure_finite(self.field_strength, "field_strength must be finite")?;
        ensure_non_negative(
            self.field_confinement_gain,
            "field_confinement_gain must be non-negative",
        )?;
        ensure_positive(
            self.min_confinement_time,
            "min_confinement_time must be positive",
        )?;
        ensure_positive(
            self.particle_confinement_time,
            "particle_confinement_time must be positive",
        )?;
        ensure_finite(self.heating_power, "heating_power must be finite")?;
        ensure_fraction(
            self.ion_heating_fraction,
            "ion_heating_fraction must be in [0, 1]",
        )?;
        ensure_finite(self.fueling_rate, "fueling_rate must be finite")?;
        ensure_finite(self.ion_control_gain, "ion_control_gain must be finite")?;
        ensure_finite(
            self.electron_control_gain,
            "electron_control_gain must be finite",
        )?;
        ensure_positive(self.floor, "floor must be positive")?;
        Ok(())
    }
}

/// Fusion plasma module with state `[n, Ti, Te]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FusionModel {
    params: FusionParams,
    state: [f64; 3],
}

impl FusionModel {
    /// Create a fusion model starting from the initial values in `params`.
    pub fn new(params: FusionParams) -> PhysicsResult<Self> {
        params.validate()?;
        let state = [
            params.initial_density,
            params.initial_ion_temperature,
            params.initial_electron_temperature,
        ];
        Ok(Self { params, state })
    }

    pub fn params(&self) -> &FusionParams {
        &self.params
    }

    pub fn density(&self) -> f64 {
        self.state[0]
    }

    pub fn ion_temperature(&self) -> f64 {
        self.state[1]
    }

    pub fn electron_temperature(&self) -> f64 {
        self.state[2]
    }

    /// Reaction rate coefficient `<sv>` at ion temperature `ti`.
    ///
    /// Non-negative and strictly increasing for `ti > 0`, saturating at
    /// `reactivity_peak`.
    pub fn reactivity(&self, ti: f64) -> f64 {
        let x = floor_positive(ti, self.params.floor) / self.params.reactivity_peak_temperature;
        let x2 = x * x;
        self.params.reactivity_peak * x2 / (1.0 + x2)
    }

    /// Fusion power density for a 50/50 fuel mix.
    pub fn fusion_power(&self, n: f64, ti: f64) -> f64 {
        let n = floor_positive(n, self.params.floor);
        self.params.fusion_energy * 0.25 * n * n * self.reactivity(ti)
    }

    /// Radiated power density.
    pub fn radiated_power(&self, n: f64, te: f64) -> f64 {
        let n = floor_positive(n, self.params.floor);
        let te = floor_positive(te, self.params.floor);
        self.params.radiation_coefficient * n * n * te.sqrt()
    }

    /// Energy confinement time with `field_offset` added to the configured
    /// field strength.
    pub fn confinement_time(&self, field_offset: f64) -> f64 {
        let b = self.params.field_strength + field_offset;
        let tau = self.params.confinement_time * (1.0 + self.params.field_confinement_gain * b);
        floor_positive(tau, self.params.min_confinement_time)
    }

    /// Power transferred from electrons to ions.
    pub fn equilibration_power(&self, n: f64, ti: f64, te: f64) -> f64 {
        let floor = self.params.floor;
        let n = floor_positive(n, floor);
        let ti = floor_positive(ti, floor);
        let te = floor_positive(te, floor);
        safe_div(
            self.params.equilibration_coefficient * n * n * (te - ti),
            te.powf(1.5),
            floor,
        )
    }
}

impl PhysicsModule for FusionModel {
    fn name(&self) -> &str {
        "fusion"
    }

    fn state_labels(&self) -> &'static [&'static str] {
        LABELS
    }

    fn derivative(&self, _t: f64, state: &[f64], inputs: &InputMap) -> PhysicsResult<Vec<f64>> {
        check_shape(self.name(), LABELS.len(), state)?;
        let p = &self.params;
        let n = floor_positive(state[0], p.floor);
        let ti = floor_positive(state[1], p.floor);
        let te = floor_positive(state[2], p.floor);

        let sv = self.reactivity(ti);
        let p_alpha = p.alpha_fraction * self.fusion_power(n, ti);
        let p_rad = self.radiated_power(n, te);
        let p_ei = self.equilibration_power(n, ti, te);
        let p_heat = p.heating_power + inputs.get(keys::HEATING_POWER);
        let tau_e = self.confinement_time(inputs.get(keys::FIELD_STRENGTH));
        let control = inputs.get(keys::CONTROL_HEATING);
        let heat_capacity = 1.5 * n;

        let fuel = p.fueling_rate + inputs.get(keys::FUEL_FEED);
        let burn = 0.5 * n * n * sv;
        let particle_loss = safe_div(n, p.particle_confinement_time, p.min_confinement_time);
        let dn = fuel - burn - particle_loss;

        let ion_power = p.ion_heating_fraction * p_heat + p.alpha_ion_fraction * p_alpha + p_ei;
        let dti = safe_div(ion_power, heat_capacity, p.floor) - ti / tau_e
            + p.ion_control_gain * control;

        let electron_power = (1.0 - p.ion_heating_fraction) * p_heat
            + (1.0 - p.alpha_ion_fraction) * p_alpha
            - p_ei
            - p_rad;
        let dte = safe_div(electron_power, heat_capacity, p.floor) - te / tau_e
            + p.electron_control_gain * control;

        Ok(vec![dn, dti, dte])
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
