//! Lazy fixed-grid trajectories.

use fc_core::{grid_time, step_count};

use crate::error::SimResult;
use crate::integrator::Integrator;
use crate::model::TransientModel;

/// Lazy sequence of `(t, x)` samples on a fixed time grid.
///
/// The first item is the initial point `(t0, x0)`; each following item is one
/// integrator step. A failed step is yielded once as `Err`, after which the
/// sequence ends. Building a new trajectory with the same inputs replays the
/// same sequence.
pub struct Trajectory<'m, M: TransientModel, I: Integrator> {
    model: &'m mut M,
    integrator: I,
    t0: f64,
    dt: f64,
    steps: usize,
    emitted: usize,
    state: Option<M::State>,
}

/// Integrate `model` from `(t0, y0)` to `t_final` with fixed step `dt`.
///
/// Takes `ceil((t_final - t0) / dt)` steps, so the trajectory has that many
/// items plus the initial point.
pub fn integrate<'m, M, I>(
    model: &'m mut M,
    integrator: I,
    t0: f64,
    y0: M::State,
    t_final: f64,
    dt: f64,
) -> SimResult<Trajectory<'m, M, I>>
where
    M: TransientModel,
    I: Integrator,
{
    let steps = step_count(t0, t_final, dt)?;
    Ok(Trajectory {
        model,
        integrator,
        t0,
        dt,
        steps,
        emitted: 0,
        state: Some(y0),
    })
}

impl<'m, M: TransientModel, I: Integrator> Trajectory<'m, M, I> {
    /// Number of integrator steps this trajectory takes in total.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// The model being integrated, as left by the most recent step.
    pub fn model(&self) -> &M {
        &*self.model
    }

    /// Mutable access to the model between steps.
    pub fn model_mut(&mut self) -> &mut M {
        &mut *self.model
    }
}

impl<'m, M: TransientModel, I: Integrator> Iterator for Trajectory<'m, M, I> {
    type Item = SimResult<(f64, M::State)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.emitted > self.steps {
            return None;
        }
        let x = self.state.take()?;

        if self.emitted == 0 {
            self.emitted = 1;
            self.state = Some(x.clone());
            return Some(Ok((self.t0, x)));
        }

        let t = grid_time(self.t0, self.dt, self.emitted - 1);
        match self.integrator.step(&mut *self.model, t, &x, self.dt) {
            Ok(x_next) => {
                let t_next = grid_time(self.t0, self.dt, self.emitted);
                self.emitted += 1;
                self.state = Some(x_next.clone());
                Some(Ok((t_next, x_next)))
            }
            Err(e) => Some(Err(e)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.state.is_none() {
            return (0, Some(0));
        }
        let remaining = (self.steps + 1).saturating_sub(self.emitted);
        (0, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimError;
    use crate::integrator::{IntegratorType, RK4};
    use crate::model::FnModel;
    use nalgebra::{DVector, dvector};

    fn decay() -> FnModel<impl FnMut(f64, &DVector<f64>) -> DVector<f64>> {
        FnModel::new(dvector![1.0], |_, y: &DVector<f64>| -y)
    }

    #[test]
    fn yields_initial_point_then_steps() {
        let mut model = decay();
        let samples: Vec<_> = integrate(&mut model, RK4, 0.0, dvector![1.0], 1.0, 0.1)
            .unwrap()
            .collect::<SimResult<_>>()
            .unwrap();
        assert_eq!(samples.len(), 11);
        assert_eq!(samples[0].0, 0.0);
        assert_eq!(samples[0].1[0], 1.0);
        assert!((samples[10].0 - 1.0).abs() < 1e-12);
        assert!((samples[10].1[0] - (-1.0f64).exp()).abs() < 1e-6);
    }

    #[test]
    fn partial_final_step_overshoots_horizon() {
        let mut model = decay();
        let traj = integrate(&mut model, RK4, 0.0, dvector![1.0], 0.25, 0.1).unwrap();
        assert_eq!(traj.steps(), 3);
        let last = traj.last().unwrap().unwrap();
        assert!((last.0 - 0.3).abs() < 1e-12);
    }

    #[test]
    fn replay_is_identical() {
        let run = || {
            let mut model = decay();
            integrate(&mut model, IntegratorType::RK4, 0.0, dvector![1.0], 2.0, 0.01)
                .unwrap()
                .map(|r| r.unwrap().1[0])
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn rejects_bad_grid() {
        let mut model = decay();
        assert!(integrate(&mut model, RK4, 0.0, dvector![1.0], 1.0, 0.0).is_err());
        assert!(integrate(&mut model, RK4, 1.0, dvector![1.0], 0.0, 0.1).is_err());
    }

    struct FailingModel {
        calls_until_failure: usize,
    }

    impl TransientModel for FailingModel {
        type State = f64;

        fn initial_state(&self) -> Self::State {
            0.0
        }

        fn rhs(&mut self, _t: f64, _x: &Self::State) -> SimResult<Self::State> {
            if self.calls_until_failure == 0 {
                return Err(SimError::Model {
                    message: "intentional failure".to_string(),
                });
            }
            self.calls_until_failure -= 1;
            Ok(1.0)
        }

        fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
            a + b
        }

        fn scale(&self, a: &Self::State, scale: f64) -> Self::State {
            a * scale
        }
    }

    #[test]
    fn failure_ends_the_sequence() {
        // One full RK4 step succeeds, the second fails on its first stage.
        let mut model = FailingModel {
            calls_until_failure: 4,
        };
        let items: Vec<_> = integrate(&mut model, RK4, 0.0, 0.0, 1.0, 0.1)
            .unwrap()
            .collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        assert!(items[1].is_ok());
        assert!(matches!(
            &items[2],
            Err(SimError::Model { message }) if message == "intentional failure"
        ));
    }
}
