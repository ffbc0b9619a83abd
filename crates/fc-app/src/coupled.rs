//! Coupled derivative of the fusion plasma, field mode and PID loop.

use fc_controls::PidLoop;
use fc_physics::{FieldOscillatorModel, FusionModel, InputMap, PhysicsModule, keys};
use fc_sim::{SimError, SimResult, TransientModel};
use nalgebra::DVector;

use crate::composer::StateComposer;
use crate::config::{ControlUpdate, CouplingConfig, SimConfig};
use crate::error::{AppError, AppResult};

/// Modules, controller and coupling of one run.
///
/// The combined state is laid out as `[n, Ti, Te, E, V]`. Module states are
/// overwritten at every derivative evaluation, so between steps they only
/// describe the accepted state after the driver unpacks it.
#[derive(Debug, Clone)]
pub struct CoupledPlant {
    fusion: FusionModel,
    oscillator: FieldOscillatorModel,
    pid: PidLoop,
    composer: StateComposer,
    coupling: CouplingConfig,
    setpoint: f64,
    control_update: ControlUpdate,
    control_dt: f64,
    held_control: f64,
    applied_control: f64,
    initial_state: DVector<f64>,
}

impl CoupledPlant {
    /// Build modules and controller from `config`.
    ///
    /// `control_dt` is the interval handed to the PID on every update.
    pub fn new(config: &SimConfig, control_dt: f64) -> AppResult<Self> {
        config.validate()?;
        let fusion = config.build_fusion()?;
        let oscillator = config.build_oscillator()?;
        let composer = StateComposer::from_modules(&[&fusion, &oscillator]);
        let initial_state = composer.pack(&[&fusion, &oscillator])?;
        Ok(Self {
            fusion,
            oscillator,
            pid: config.build_controller()?,
            composer,
            coupling: config.coupling.clone(),
            setpoint: config.controller.setpoint,
            control_update: config.controller.update,
            control_dt,
            held_control: 0.0,
            applied_control: 0.0,
            initial_state,
        })
    }

    pub fn fusion(&self) -> &FusionModel {
        &self.fusion
    }

    pub fn oscillator(&self) -> &FieldOscillatorModel {
        &self.oscillator
    }

    pub fn controller(&self) -> &PidLoop {
        &self.pid
    }

    pub fn composer(&self) -> &StateComposer {
        &self.composer
    }

    pub fn control_update(&self) -> ControlUpdate {
        self.control_update
    }

    /// Control signal used by the most recent derivative evaluation.
    pub fn applied_control(&self) -> f64 {
        self.applied_control
    }

    /// Combined state of the stored module states.
    pub fn pack(&self) -> AppResult<DVector<f64>> {
        self.composer.pack(&self.modules())
    }

    /// Overwrite the module states from a combined state.
    pub fn unpack(&mut self, combined: &DVector<f64>) -> AppResult<()> {
        let composer = &self.composer;
        composer.unpack(
            combined,
            &mut [
                &mut self.fusion as &mut dyn PhysicsModule,
                &mut self.oscillator,
            ],
        )
    }

    /// Advance the controller from the stored ion temperature and hold the
    /// output for the following step.
    ///
    /// Only meaningful under [`ControlUpdate::PerStep`]; the driver calls it
    /// once per accepted step.
    pub fn sample_controller(&mut self) -> f64 {
        self.held_control = self.advance_controller();
        self.held_control
    }

    /// Confinement field offset from the stored field amplitude.
    pub fn field_offset(&self) -> f64 {
        self.coupling.field_feedback * self.oscillator.field()
    }

    /// Inputs of the fusion module for the given control signal.
    pub fn fusion_inputs(&self, control: f64) -> InputMap {
        InputMap::new()
            .with(keys::CONTROL_HEATING, control)
            .with(keys::FUEL_FEED, self.coupling.fuel_feed)
            .with(keys::HEATING_POWER, self.coupling.extra_heating)
            .with(keys::FIELD_STRENGTH, self.field_offset())
    }

    /// Inputs of the field oscillator, driven by the stored fusion power.
    pub fn oscillator_inputs(&self) -> InputMap {
        let fusion_power = self
            .fusion
            .fusion_power(self.fusion.density(), self.fusion.ion_temperature());
        InputMap::new().with(keys::EM_DRIVE, self.coupling.em_drive_gain * fusion_power)
    }

    fn modules(&self) -> [&dyn PhysicsModule; 2] {
        [&self.fusion, &self.oscillator]
    }

    fn advance_controller(&mut self) -> f64 {
        self.pid.step(
            self.setpoint,
            self.fusion.ion_temperature(),
            self.control_dt,
        )
    }

    fn control_signal(&mut self) -> f64 {
        match self.control_update {
            ControlUpdate::PerStage => self.advance_controller(),
            ControlUpdate::PerStep => self.held_control,
        }
    }
}

/// Time derivative of the combined state.
///
/// Unpacks `combined` into the modules, obtains the control signal, builds
/// each module's inputs from that consistent snapshot and concatenates the
/// module derivatives in composer order. Under [`ControlUpdate::PerStage`]
/// every call advances the controller once.
pub fn coupled_derivative(
    t: f64,
    combined: &DVector<f64>,
    plant: &mut CoupledPlant,
) -> AppResult<DVector<f64>> {
    plant.unpack(combined)?;

    let control = plant.control_signal();
    plant.applied_control = control;

    let inputs = [plant.fusion_inputs(control), plant.oscillator_inputs()];
    let mut derivative = DVector::zeros(plant.composer.total_len());
    for ((slot, module), inputs) in plant
        .composer
        .slots()
        .iter()
        .zip(plant.modules())
        .zip(&inputs)
    {
        let d = module.derivative(t, &module.get_state(), inputs)?;
        if d.len() != slot.len {
            return Err(AppError::Layout {
                what: format!(
                    "module '{}' returned {} derivatives, slot holds {}",
                    slot.name,
                    d.len(),
                    slot.len
                ),
            });
        }
        derivative.as_mut_slice()[slot.range()].copy_from_slice(&d);
    }
    Ok(derivative)
}

impl TransientModel for CoupledPlant {
    type State = DVector<f64>;

    fn initial_state(&self) -> Self::State {
        self.initial_state.clone()
    }

    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State> {
        coupled_derivative(t, x, self).map_err(|e| SimError::Model {
            message: e.to_string(),
        })
    }

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
        a + b
    }

    fn scale(&self, a: &Self::State, scale: f64) -> Self::State {
        a * scale
    }
}
