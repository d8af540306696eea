use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The physical limits of a simulated vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleParams {
    /// Distance between the front and rear axles, in m.
    pub wheelbase: f64,
    /// The maximum linear acceleration, in m/s<sup>2</sup>.
    pub max_acceleration: f64,
    /// The maximum rate of change of the steering angle, in rad/s.
    pub max_steering_rate: f64,
    /// The maximum steering angle either side of centre, in rad.
    pub max_steering_angle: f64,
    /// The maximum speed in either direction, in m/s.
    pub max_velocity: f64,
}

/// An error raised when building a [KinematicModel](super::KinematicModel).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("Vehicle parameter `{name}` must be positive, found {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            wheelbase: 2.5,
            max_acceleration: 1.0,
            max_steering_rate: 45f64.to_radians(),
            max_steering_angle: 45f64.to_radians(),
            max_velocity: 10.0,
        }
    }
}

impl VehicleParams {
    /// Checks that every limit is a positive, finite number.
    pub fn validate(&self) -> Result<(), ModelError> {
        let Self {
            wheelbase,
            max_acceleration,
            max_steering_rate,
            max_steering_angle,
            max_velocity,
        } = *self;

        [
            ("wheelbase", wheelbase),
            ("max_acceleration", max_acceleration),
            ("max_steering_rate", max_steering_rate),
            ("max_steering_angle", max_steering_angle),
            ("max_velocity", max_velocity),
        ]
        .into_iter()
        .find(|(_, value)| !(value.is_finite() && *value > 0.0))
        .map_or(Ok(()), |(name, value)| {
            Err(ModelError::NonPositiveParameter { name, value })
        })
    }
}
