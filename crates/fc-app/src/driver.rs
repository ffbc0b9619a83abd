//! Simulation driver.
//!
//! Owns the time grid and the combined state, steps the coupled plant with the
//! configured integrator and records one row of diagnostics per grid point.

use fc_results::TimeSeries;
use fc_sim::integrate;

use crate::config::{ControlUpdate, SimConfig};
use crate::coupled::CoupledPlant;
use crate::error::{AppError, AppResult};

/// Names of the recorded series, in recording order.
pub const SERIES: [&str; 11] = [
    "time",
    "density",
    "temperature",
    "electron_temperature",
    "fusion_power",
    "radiated_power",
    "confinement_time",
    "E_field",
    "E_rate",
    "field_energy",
    "control_signal",
];

/// Lifecycle of a [`Simulation`].
///
/// Phases only move forward. A run that fails after stepping has begun stays
/// in `Running`, and only `Initialized` accepts [`Simulation::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    Initialized,
    Running,
    Completed,
}

impl SimPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimPhase::Initialized => "initialized",
            SimPhase::Running => "running",
            SimPhase::Completed => "completed",
        }
    }
}

/// One coupled run over a fixed time grid.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    phase: SimPhase,
}

impl Simulation {
    pub fn new(config: SimConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            phase: SimPhase::Initialized,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    /// Integrate from `t = 0` to `total_time` with step `dt`.
    ///
    /// The grid is inclusive of both ends, so every series has
    /// `ceil(total_time / dt) + 1` samples. Fails before taking any step if
    /// `total_time` or `dt` is not finite and positive, leaving the phase at
    /// [`SimPhase::Initialized`]. An error raised while stepping leaves the
    /// phase at [`SimPhase::Running`] and the simulation cannot be run again.
    /// Non-finite states are recorded rather than treated as errors.
    pub fn run(&mut self, total_time: f64, dt: f64) -> AppResult<TimeSeries> {
        if self.phase != SimPhase::Initialized {
            return Err(AppError::InvalidPhase {
                phase: self.phase.as_str(),
            });
        }
        if !(total_time.is_finite() && total_time > 0.0) {
            return Err(AppError::InvalidConfig {
                what: "total_time must be finite and positive",
            });
        }
        if !(dt.is_finite() && dt > 0.0) {
            return Err(AppError::InvalidConfig {
                what: "dt must be finite and positive",
            });
        }

        let mut plant = CoupledPlant::new(&self.config, dt)?;
        let per_step = plant.control_update() == ControlUpdate::PerStep;
        let y0 = plant.pack()?;
        let mut trajectory = integrate(&mut plant, self.config.integrator, 0.0, y0, total_time, dt)?;
        let steps = trajectory.steps();

        self.phase = SimPhase::Running;
        tracing::info!(
            total_time,
            dt,
            steps,
            integrator = ?self.config.integrator,
            stages = self.config.integrator.stages(),
            control_update = ?self.config.controller.update,
            "starting simulation"
        );

        let mut series = TimeSeries::with_series(&SERIES)?;
        let mut warned = false;
        let mut index = 0;
        let mut final_time = 0.0;
        while let Some(sample) = trajectory.next() {
            let (t, y) = sample?;
            let plant = trajectory.model_mut();
            plant.unpack(&y)?;

            let row = record(t, plant);
            if !warned && row.iter().any(|v| !v.is_finite()) {
                tracing::warn!(t, "non-finite value in simulation state");
                warned = true;
            }
            series.push_row(&row)?;
            tracing::debug!(
                step = index,
                t,
                temperature = row[2],
                control = row[10],
                "step"
            );

            if per_step && index < steps {
                plant.sample_controller();
            }
            final_time = t;
            index += 1;
        }

        self.phase = SimPhase::Completed;
        tracing::info!(steps, final_time, "simulation completed");
        Ok(series)
    }
}

/// Diagnostics of the accepted state stored in `plant`, in [`SERIES`] order.
fn record(t: f64, plant: &CoupledPlant) -> [f64; 11] {
    let fusion = plant.fusion();
    let oscillator = plant.oscillator();
    let (n, ti, te) = (
        fusion.density(),
        fusion.ion_temperature(),
        fusion.electron_temperature(),
    );
    [
        t,
        n,
        ti,
        te,
        fusion.fusion_power(n, ti),
        fusion.radiated_power(n, te),
        fusion.confinement_time(plant.field_offset()),
        oscillator.field(),
        oscillator.field_rate(),
        oscillator.energy(),
        plant.applied_control(),
    ]
}

/// Run the default configuration for `total_time` with step `dt`.
pub fn run_simulation(total_time: f64, dt: f64) -> AppResult<TimeSeries> {
    run_simulation_with(SimConfig::default(), total_time, dt)
}

/// Run `config` for `total_time` with step `dt`.
pub fn run_simulation_with(config: SimConfig, total_time: f64, dt: f64) -> AppResult<TimeSeries> {
    Simulation::new(config)?.run(total_time, dt)
}
