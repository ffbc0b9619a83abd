//! Controller update policies of the coupled plant.

use fc_app::{ControlUpdate, CoupledPlant, SimConfig, run_simulation_with};
use fc_sim::{IntegratorType, TransientModel, integrate};

fn config(update: ControlUpdate) -> SimConfig {
    let mut config = SimConfig::default();
    config.controller.update = update;
    config
}

#[test]
fn per_stage_advances_controller_four_times_per_step() {
    let mut plant = CoupledPlant::new(&config(ControlUpdate::PerStage), 0.1).unwrap();
    let y0 = plant.initial_state();
    let samples = integrate(&mut plant, IntegratorType::RK4, 0.0, y0, 1.0, 0.1)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(samples.len(), 11);
    assert_eq!(plant.controller().updates(), 40);
}

#[test]
fn euler_advances_controller_once_per_step() {
    let mut plant = CoupledPlant::new(&config(ControlUpdate::PerStage), 0.1).unwrap();
    let y0 = plant.initial_state();
    let trajectory = integrate(&mut plant, IntegratorType::ForwardEuler, 0.0, y0, 1.0, 0.1).unwrap();
    assert_eq!(trajectory.count(), 11);
    assert_eq!(plant.controller().updates(), 10);
}

#[test]
fn per_step_holds_output_through_the_stages() {
    let mut plant = CoupledPlant::new(&config(ControlUpdate::PerStep), 0.1).unwrap();
    let y0 = plant.initial_state();
    let mut trajectory = integrate(&mut plant, IntegratorType::RK4, 0.0, y0, 1.0, 0.1).unwrap();
    let steps = trajectory.steps();
    let mut index = 0;
    while let Some(sample) = trajectory.next() {
        let (_, y) = sample.unwrap();
        let plant = trajectory.model_mut();
        plant.unpack(&y).unwrap();
        if index < steps {
            let held = plant.sample_controller();
            assert_eq!(plant.controller().last_output(), held);
        }
        index += 1;
    }
    drop(trajectory);
    assert_eq!(plant.controller().updates(), 10);
}

#[test]
fn first_held_output_comes_from_initial_state() {
    let series = run_simulation_with(config(ControlUpdate::PerStep), 1.0, 0.1).unwrap();
    let control = series.get("control_signal").unwrap();
    assert_eq!(control[0], 0.0);
    // Ti(0) = 2, setpoint 3: 0.5 * 1 + 0.1 * (1 * 0.1)
    assert!((control[1] - 0.51).abs() < 1e-12);
}

#[test]
fn policies_diverge_after_the_first_step() {
    let stage = run_simulation_with(config(ControlUpdate::PerStage), 1.0, 0.1).unwrap();
    let step = run_simulation_with(config(ControlUpdate::PerStep), 1.0, 0.1).unwrap();

    let (a, b) = (
        stage.get("temperature").unwrap(),
        step.get("temperature").unwrap(),
    );
    assert_eq!(a[0], b[0]);
    assert_ne!(a[1], b[1]);
    assert!(a.iter().chain(b).all(|v| v.is_finite()));
    assert_ne!(
        stage.get("control_signal").unwrap()[1],
        step.get("control_signal").unwrap()[1]
    );
}
