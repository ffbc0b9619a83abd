//! Simulation runner and result recording.

use crate::error::SimResult;
use crate::integrator::IntegratorType;
use crate::model::TransientModel;
use crate::trajectory::integrate;

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Start time (seconds)
    pub t0: f64,
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Final simulation time (seconds)
    pub t_end: f64,
    /// Record every N-th step (decimation)
    pub record_every: usize,
    /// Integrator type (default: RK4)
    pub integrator: IntegratorType,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            t0: 0.0,
            dt: 1e-3,
            t_end: 1.0,
            record_every: 1,
            integrator: IntegratorType::default(),
        }
    }
}

/// Record of simulation results.
#[derive(Clone, Debug)]
pub struct SimRecord<S> {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<S>,
}

/// Run a transient simulation from the model's initial state.
///
/// The initial and final points are always recorded; in between every
/// `record_every`-th step is kept.
pub fn run_sim<M: TransientModel>(
    model: &mut M,
    opts: &SimOptions,
) -> SimResult<SimRecord<M::State>> {
    if opts.record_every == 0 {
        return Err(crate::error::SimError::InvalidArg {
            what: "record_every must be positive",
        });
    }

    let x0 = model.initial_state();
    let trajectory = integrate(model, opts.integrator, opts.t0, x0, opts.t_end, opts.dt)?;
    let steps = trajectory.steps();

    let mut t_record = Vec::new();
    let mut x_record = Vec::new();
    for (step, sample) in trajectory.enumerate() {
        let (t, x) = sample?;
        if step % opts.record_every == 0 || step == steps {
            t_record.push(t);
            x_record.push(x);
        }
    }

    tracing::debug!(steps, recorded = t_record.len(), "transient run finished");

    Ok(SimRecord {
        t: t_record,
        x: x_record,
    })
}
