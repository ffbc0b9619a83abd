//! Simulation configuration.
//!
//! Every field carries a default, so a YAML document only needs to name the
//! values it overrides:
//!
//! ```yaml
//! controller:
//!   kp: 0.8
//!   update: per_step
//! coupling:
//!   em_drive_gain: 5.0
//! ```

use std::path::Path;

use fc_controls::{PIDController, PidLoop};
use fc_physics::{FieldOscillatorModel, FusionModel, FusionParams, OscillatorParams};
use fc_sim::IntegratorType;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// When the controller is advanced relative to the integrator stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlUpdate {
    /// Advance at every derivative evaluation (four times per RK4 step).
    #[default]
    PerStage,
    /// Sample once per accepted step and hold the output through its stages.
    PerStep,
}

/// PID gains, limits and the ion temperature setpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Ion temperature setpoint (keV).
    pub setpoint: f64,
    pub integral_limit: Option<f64>,
    pub output_limit: Option<f64>,
    pub update: ControlUpdate,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            kp: 0.5,
            ki: 0.1,
            kd: 0.02,
            setpoint: 3.0,
            integral_limit: Some(50.0),
            output_limit: None,
            update: ControlUpdate::PerStage,
        }
    }
}

impl ControllerConfig {
    /// Build the PID configuration, checking gains and limits.
    pub fn build(&self) -> AppResult<PIDController> {
        let mut pid = PIDController::new(self.kp, self.ki, self.kd)?;
        if let Some(limit) = self.integral_limit {
            pid = pid.with_integral_limit(limit)?;
        }
        if let Some(limit) = self.output_limit {
            pid = pid.with_output_limit(limit)?;
        }
        Ok(pid)
    }
}

/// Cross-module coupling coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouplingConfig {
    /// Field drive per unit fusion power: `em_drive = em_drive_gain * P_fus`.
    pub em_drive_gain: f64,
    /// Constant fuel feed passed to the fusion module.
    pub fuel_feed: f64,
    /// Confinement field added per unit field amplitude:
    /// `field_strength = field_feedback * E`.
    pub field_feedback: f64,
    /// External heating added to the fusion module's own heating power.
    pub extra_heating: f64,
}

impl Default for CouplingConfig {
    fn default() -> Self {
        Self {
            em_drive_gain: 10.0,
            fuel_feed: 0.0,
            field_feedback: 1.0,
            extra_heating: 0.0,
        }
    }
}

/// Complete configuration of one coupled run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub fusion: FusionParams,
    pub oscillator: OscillatorParams,
    pub controller: ControllerConfig,
    pub coupling: CouplingConfig,
    pub integrator: IntegratorType,
}

impl SimConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> AppResult<Self> {
        let config: SimConfig =
            serde_yaml::from_str(text).map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file.
    pub fn from_yaml_file(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::ConfigFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Check every parameter without building anything.
    pub fn validate(&self) -> AppResult<()> {
        self.fusion.validate()?;
        self.oscillator.validate()?;
        self.controller.build()?;
        fc_core::ensure_finite(self.controller.setpoint, "setpoint must be finite")?;
        fc_core::ensure_finite(self.coupling.em_drive_gain, "em_drive_gain must be finite")?;
        fc_core::ensure_finite(self.coupling.fuel_feed, "fuel_feed must be finite")?;
        fc_core::ensure_finite(self.coupling.field_feedback, "field_feedback must be finite")?;
        fc_core::ensure_finite(self.coupling.extra_heating, "extra_heating must be finite")?;
        Ok(())
    }

    pub fn build_fusion(&self) -> AppResult<FusionModel> {
        Ok(FusionModel::new(self.fusion.clone())?)
    }

    pub fn build_oscillator(&self) -> AppResult<FieldOscillatorModel> {
        Ok(FieldOscillatorModel::new(self.oscillator.clone())?)
    }

    pub fn build_controller(&self) -> AppResult<PidLoop> {
        Ok(PidLoop::new(self.controller.build()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = SimConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.controller.setpoint, 3.0);
        assert_eq!(config.controller.update, ControlUpdate::PerStage);
        assert_eq!(config.integrator, IntegratorType::RK4);
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let yaml = r#"
controller:
  kp: 0.8
  update: per_step
coupling:
  em_drive_gain: 5.0
integrator: forward_euler
"#;
        let config = SimConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.controller.kp, 0.8);
        assert_eq!(config.controller.ki, 0.1);
        assert_eq!(config.controller.update, ControlUpdate::PerStep);
        assert_eq!(config.coupling.em_drive_gain, 5.0);
        assert_eq!(config.coupling.fuel_feed, 0.0);
        assert_eq!(config.coupling.field_feedback, 1.0);
        assert_eq!(config.integrator, IntegratorType::ForwardEuler);
        assert_eq!(config.fusion, FusionParams::default());
    }

    #[test]
    fn yaml_round_trip() {
        let mut config = SimConfig::default();
        config.oscillator.omega = 3.5;
        config.controller.output_limit = Some(20.0);
        let text = config.to_yaml_string().unwrap();
        assert_eq!(SimConfig::from_yaml_str(&text).unwrap(), config);
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let err = SimConfig::from_yaml_str("controller: [1, 2").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        let err = SimConfig::from_yaml_str("controller:\n  kp: fast\n").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let err = SimConfig::from_yaml_str("oscillator:\n  omega: -1.0\n").unwrap_err();
        assert!(matches!(err, AppError::Physics(_)));
        let err = SimConfig::from_yaml_str("controller:\n  integral_limit: 0.0\n").unwrap_err();
        assert!(matches!(err, AppError::Control(_)));

        let mut config = SimConfig::default();
        config.coupling.em_drive_gain = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(AppError::InvalidConfig { .. })
        ));
        let mut config = SimConfig::default();
        config.coupling.field_feedback = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/nonexistent/fusioncraft/config.yaml");
        match SimConfig::from_yaml_file(path) {
            Err(AppError::ConfigFileRead { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn builders_use_configured_values() {
        let mut config = SimConfig::default();
        config.fusion.initial_ion_temperature = 4.0;
        config.oscillator.initial_field = 0.5;
        assert_eq!(config.build_fusion().unwrap().ion_temperature(), 4.0);
        assert_eq!(config.build_oscillator().unwrap().field(), 0.5);
        let pid = config.build_controller().unwrap();
        assert_eq!(pid.controller().integral_limit, Some(50.0));
        assert_eq!(pid.updates(), 0);
    }
}
