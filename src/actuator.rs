//! Rate-limited scalar actuators.

use crate::util::Interval;
use serde::{Deserialize, Serialize};

/// A scalar value which moves toward a setpoint at a bounded rate.
///
/// Models a physical actuator with finite slew rate, e.g. a steering servo
/// or the drive train's acceleration limit. Both the setpoint and the value are
/// always kept within the actuator's limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateLimitedActuator {
    /// The current value.
    value: f64,
    /// The value being moved towards.
    setpoint: f64,
    /// The maximum rate of change in units per second.
    rate_of_change: f64,
    /// The range of admissible values.
    limits: Interval<f64>,
}

impl RateLimitedActuator {
    /// Creates a new actuator resting at `value`.
    ///
    /// # Parameters
    /// * `rate_of_change` - The maximum rate of change in units per second
    /// * `value` - The initial value; clamped to the limits
    /// * `min` - The lower limit
    /// * `max` - The upper limit
    pub fn new(rate_of_change: f64, value: f64, min: f64, max: f64) -> Self {
        debug_assert!(min <= max, "actuator limits are inverted");
        let limits = Interval::new(min, max);
        let value = limits.clamp(value);
        Self {
            value,
            setpoint: value,
            rate_of_change,
            limits,
        }
    }

    /// The current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The current setpoint.
    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    /// The maximum rate of change in units per second.
    pub fn rate_of_change(&self) -> f64 {
        self.rate_of_change
    }

    /// The range of admissible values.
    pub fn limits(&self) -> Interval<f64> {
        self.limits
    }

    /// Sets a new setpoint.
    ///
    /// Setpoints outside of the limits are silently saturated, so controllers
    /// may request more than the actuator can deliver.
    pub fn set_setpoint(&mut self, setpoint: f64) {
        self.setpoint = self.limits.clamp(setpoint);
    }

    /// Moves the value toward the setpoint by at most `rate_of_change * dt`.
    ///
    /// If the setpoint is within reach the value lands on it exactly.
    pub fn step(&mut self, dt: f64) {
        let error = self.setpoint - self.value;
        let max_step = self.rate_of_change * dt;
        self.value = if error.abs() <= max_step {
            self.setpoint
        } else {
            self.value + error.signum() * max_step
        };
        self.value = self.limits.clamp(self.value);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::Rng;

    #[test]
    fn setpoint_is_saturated() {
        let mut act = RateLimitedActuator::new(1.0, 0.0, -0.5, 0.5);
        act.set_setpoint(3.0);
        assert_eq!(act.setpoint(), 0.5);
        act.set_setpoint(-3.0);
        assert_eq!(act.setpoint(), -0.5);
    }

    #[test]
    fn moves_at_limited_rate() {
        let mut act = RateLimitedActuator::new(2.0, 0.0, -10.0, 10.0);
        act.set_setpoint(5.0);
        act.step(0.1);
        assert_approx_eq!(act.value(), 0.2);
        act.set_setpoint(-5.0);
        act.step(0.5);
        assert_approx_eq!(act.value(), -0.8);
    }

    #[test]
    fn snaps_to_setpoint_without_overshoot() {
        let mut act = RateLimitedActuator::new(1.0, 0.0, -1.0, 1.0);
        act.set_setpoint(0.05);
        act.step(0.1);
        assert_eq!(act.value(), 0.05);
        act.step(0.1);
        assert_eq!(act.value(), 0.05);
    }

    #[test]
    fn never_exceeds_rate_or_limits() {
        let mut rng = rand::thread_rng();
        let mut act = RateLimitedActuator::new(0.7, 0.0, -1.5, 2.5);
        for _ in 0..1000 {
            if rng.gen_bool(0.1) {
                act.set_setpoint(rng.gen_range(-5.0..5.0));
            }
            let dt = rng.gen_range(0.001..0.5);
            let before = act.value();
            act.step(dt);
            let after = act.value();
            assert!((after - before).abs() <= 0.7 * dt + 1e-12);
            assert!(act.limits().contains(after));
        }
    }
}
