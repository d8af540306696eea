//! Loading of simulation parameters from TOML.

use crate::controller::{ControlError, ControllerParams};
use crate::vehicle::{ModelError, VehicleParams};
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::Path;
use thiserror::Error;

/// Everything needed to set up a closed-loop [Simulation](crate::Simulation)
/// apart from the track.
///
/// Any missing field or table falls back to its default.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub vehicle: VehicleParams,
    pub controller: ControllerParams,
    /// The integration time step in s.
    pub dt: f64,
    /// Multiple of the nominal traversal time after which a run is abandoned.
    pub timeout_factor: f64,
}

/// An error that occurs while loading a [SimulationConfig].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read the config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse the config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid vehicle parameters: {0}")]
    Vehicle(#[from] ModelError),

    #[error("Invalid controller parameters: {0}")]
    Controller(#[from] ControlError),

    #[error("`{name}` must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            vehicle: VehicleParams::default(),
            controller: ControllerParams::default(),
            dt: 0.01,
            timeout_factor: 5.0,
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a config from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Checks that the time step, timeout factor, vehicle limits and controller
    /// settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("dt", self.dt), ("timeout_factor", self.timeout_factor)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        self.vehicle.validate()?;
        self.controller.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::controller::SteeringLaw;

    #[test]
    fn empty_config_is_default() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.dt, 0.01);
        assert_eq!(config.timeout_factor, 5.0);
    }

    #[test]
    fn partial_tables() {
        let config = SimulationConfig::from_toml_str(
            r#"
            dt = 0.02

            [vehicle]
            wheelbase = 3.0

            [controller]
            look_ahead_distance = 2.0
            steering_law = "classical"
            "#,
        )
        .unwrap();
        assert_eq!(config.dt, 0.02);
        assert_eq!(config.vehicle.wheelbase, 3.0);
        assert_eq!(config.vehicle.max_velocity, 10.0);
        assert_eq!(config.controller.look_ahead_distance, 2.0);
        assert_eq!(config.controller.target_speed, 0.1);
        assert_eq!(config.controller.steering_law, SteeringLaw::Classical);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            SimulationConfig::from_toml_str("dt = 0.0"),
            Err(ConfigError::NonPositive { name: "dt", .. })
        ));
        assert!(matches!(
            SimulationConfig::from_toml_str("timeout_factor = -1.0"),
            Err(ConfigError::NonPositive { name: "timeout_factor", .. })
        ));
        assert!(matches!(
            SimulationConfig::from_toml_str("[vehicle]\nwheelbase = 0.0"),
            Err(ConfigError::Vehicle(_))
        ));
        assert!(matches!(
            SimulationConfig::from_toml_str("[controller]\ntarget_speed = 0.0"),
            Err(ConfigError::Controller(ControlError::InvalidParameter {
                name: "target_speed",
                ..
            }))
        ));
        assert!(matches!(
            SimulationConfig::from_toml_str("[controller]\nlook_ahead_distance = -1.0"),
            Err(ConfigError::Controller(ControlError::InvalidParameter {
                name: "look_ahead_distance",
                ..
            }))
        ));
        assert!(matches!(
            SimulationConfig::from_toml_str("dt = \"fast\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file() {
        let result = SimulationConfig::load("/nonexistent/pursuit.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
