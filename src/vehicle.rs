use crate::actuator::RateLimitedActuator;
use crate::math::{
    heading_vector, CircularArc2d, CurveSamples, LineSegment2d, ParametricCurve2d, Point2d,
    Vector2d,
};
use log::trace;
use serde::Serialize;

pub use params::{ModelError, VehicleParams};
pub use projection::PathShape;

mod params;
mod projection;

/// Below this steering angle, in rad, the projected path is a straight line.
const STRAIGHT_STEERING_THRESHOLD: f64 = 0.01;

/// A snapshot of a simulated vehicle.
///
/// States are immutable values; every integration step produces a new one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VehicleState {
    /// X position of the rear axle, in m.
    x: f64,
    /// Y position of the rear axle, in m.
    y: f64,
    /// Heading in rad, counter-clockwise from the x-axis.
    theta: f64,
    /// Signed speed in m/s.
    v: f64,
    /// Steering angle in rad, positive to the left.
    steering_angle: f64,
    /// Simulation time in s.
    time: f64,
    /// X position of the front axle, in m.
    front_x: f64,
    /// Y position of the front axle, in m.
    front_y: f64,
}

/// Points along the path the vehicle would follow with its steering held.
/// See [KinematicModel::projected_path].
pub type ProjectedPath = CurveSamples<PathShape>;

/// A kinematic bicycle model with rate-limited speed and steering.
///
/// There is no tyre slip, mass or inertia: the rear axle moves along its
/// heading and the heading changes at `v / L * tan(steering_angle)`.
#[derive(Clone, Debug)]
pub struct KinematicModel {
    /// Distance between the axles in m.
    wheelbase: f64,
    /// The current state.
    state: VehicleState,
    /// The drive train, in m/s.
    speed: RateLimitedActuator,
    /// The steering servo, in rad.
    steering: RateLimitedActuator,
}

impl VehicleState {
    /// A stationary vehicle at the given pose, at time zero.
    pub fn at_pose(x: f64, y: f64, theta: f64, wheelbase: f64) -> Self {
        Self::new(x, y, theta, 0.0, 0.0, 0.0, wheelbase)
    }

    fn new(
        x: f64,
        y: f64,
        theta: f64,
        v: f64,
        steering_angle: f64,
        time: f64,
        wheelbase: f64,
    ) -> Self {
        let front = Point2d::new(x, y) + wheelbase * heading_vector(theta);
        Self {
            x,
            y,
            theta,
            v,
            steering_angle,
            time,
            front_x: front.x,
            front_y: front.y,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn v(&self) -> f64 {
        self.v
    }

    pub fn steering_angle(&self) -> f64 {
        self.steering_angle
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn front_x(&self) -> f64 {
        self.front_x
    }

    pub fn front_y(&self) -> f64 {
        self.front_y
    }

    /// The position of the rear axle.
    pub fn position(&self) -> Point2d {
        Point2d::new(self.x, self.y)
    }

    /// The position of the front axle.
    pub fn front_position(&self) -> Point2d {
        Point2d::new(self.front_x, self.front_y)
    }

    /// A unit vector aligned with the vehicle's heading.
    pub fn heading_vector(&self) -> Vector2d {
        heading_vector(self.theta)
    }
}

impl KinematicModel {
    /// Creates a model at rest at the origin, facing along the x-axis.
    pub fn new(params: &VehicleParams) -> Result<Self, ModelError> {
        Self::with_state(params, VehicleState::at_pose(0.0, 0.0, 0.0, params.wheelbase))
    }

    /// Creates a model starting from the given state.
    ///
    /// The actuators start at the state's speed and steering angle, saturated to
    /// the vehicle's limits, and the front axle is recomputed for this wheelbase.
    pub fn with_state(params: &VehicleParams, state: VehicleState) -> Result<Self, ModelError> {
        params.validate()?;
        let VehicleParams {
            wheelbase,
            max_acceleration,
            max_steering_rate,
            max_steering_angle,
            max_velocity,
        } = *params;

        let speed = RateLimitedActuator::new(max_acceleration, state.v, -max_velocity, max_velocity);
        let steering = RateLimitedActuator::new(
            max_steering_rate,
            state.steering_angle,
            -max_steering_angle,
            max_steering_angle,
        );
        let state = VehicleState::new(
            state.x,
            state.y,
            state.theta,
            speed.value(),
            steering.value(),
            state.time,
            wheelbase,
        );

        Ok(Self {
            wheelbase,
            state,
            speed,
            steering,
        })
    }

    /// The current state.
    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    /// Distance between the axles in m.
    pub fn wheelbase(&self) -> f64 {
        self.wheelbase
    }

    /// The speed actuator.
    pub fn speed_actuator(&self) -> &RateLimitedActuator {
        &self.speed
    }

    /// The steering actuator.
    pub fn steering_actuator(&self) -> &RateLimitedActuator {
        &self.steering
    }

    /// Sets the speed the drive train accelerates toward, in m/s.
    pub fn set_target_velocity(&mut self, velocity: f64) {
        self.speed.set_setpoint(velocity);
    }

    /// Sets the steering angle the servo turns toward, in rad.
    pub fn set_target_steering_angle(&mut self, angle: f64) {
        self.steering.set_setpoint(angle);
    }

    /// Commands a path curvature (1/m, positive to the left) and a speed (m/s).
    ///
    /// Curvature is converted to a steering angle with the bicycle relation
    /// `atan(curvature * wheelbase)`.
    pub fn set_control(&mut self, curvature: f64, velocity: f64) {
        let steering_angle = (curvature * self.wheelbase).atan();
        self.set_target_velocity(velocity);
        self.set_target_steering_angle(steering_angle);
    }

    /// Advances the model by `dt` seconds and returns the new state.
    ///
    /// The actuators are stepped first, then the pose is integrated with
    /// forward Euler using the new speed and steering angle. This is exact for
    /// straight-line motion only, so keep `dt` small (around 0.01 s) on curves.
    pub fn step(&mut self, dt: f64) -> VehicleState {
        self.speed.step(dt);
        self.steering.step(dt);

        let v = self.speed.value();
        let phi = self.steering.value();
        let VehicleState { x, y, theta, .. } = self.state;

        let x_dot = v * theta.cos();
        let y_dot = v * theta.sin();
        let theta_dot = v / self.wheelbase * phi.tan();

        self.state = VehicleState::new(
            x + x_dot * dt,
            y + y_dot * dt,
            theta + theta_dot * dt,
            v,
            phi,
            self.state.time + dt,
            self.wheelbase,
        );
        trace!("vehicle state {:?}", self.state);

        self.state
    }

    /// The front axle position computed from the current pose.
    pub fn front_wheel_position(&self) -> Point2d {
        self.state.position() + self.wheelbase * self.state.heading_vector()
    }

    /// The path the front axle would trace over the next `distance` metres if the
    /// current steering angle were held, as `num_points` evenly spaced points.
    ///
    /// Nearly straight steering gives a ray along the heading; otherwise the
    /// front axle circles the instantaneous centre of rotation.
    pub fn projected_path(&self, distance: f64, num_points: usize) -> ProjectedPath {
        let front = self.front_wheel_position();
        let phi = self.state.steering_angle;

        let shape = if phi.abs() < STRAIGHT_STEERING_THRESHOLD {
            let end = front + distance * self.state.heading_vector();
            PathShape::Straight(LineSegment2d::from_ends(front, end))
        } else {
            let rear_radius = self.wheelbase / phi.tan();
            let theta = self.state.theta;
            let icr = Point2d::new(
                self.state.x - rear_radius * theta.sin(),
                self.state.y + rear_radius * theta.cos(),
            );
            PathShape::Arc(CircularArc2d::through(icr, front, distance, phi > 0.0))
        };

        shape.samples(num_points)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use cgmath::prelude::*;
    use std::f64::consts::{FRAC_PI_4, PI};

    fn model() -> KinematicModel {
        KinematicModel::new(&VehicleParams::default()).unwrap()
    }

    #[test]
    fn rejects_invalid_params() {
        let params = VehicleParams {
            max_velocity: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            KinematicModel::new(&params),
            Err(ModelError::NonPositiveParameter { name: "max_velocity", .. })
        ));
    }

    #[test]
    fn time_advances_by_dt() {
        let mut model = model();
        model.set_control(0.3, 2.0);
        let mut time = model.state().time();
        for i in 0..200 {
            let dt = 0.005 * (1 + i % 3) as f64;
            let state = model.step(dt);
            assert_approx_eq!(state.time() - time, dt);
            assert!(state.time() > time);
            time = state.time();
        }
    }

    #[test]
    fn straight_line_motion() {
        let mut model = model();
        model.set_target_velocity(5.0);
        model.set_target_steering_angle(0.0);
        for _ in 0..500 {
            model.step(0.01);
        }
        let state = model.state();
        assert!(state.x() > 0.0);
        assert_approx_eq!(state.y(), 0.0);
        assert_approx_eq!(state.theta(), 0.0);
    }

    #[test]
    fn circular_motion() {
        let params = VehicleParams {
            wheelbase: 2.0,
            max_acceleration: 5.0,
            max_steering_rate: 90f64.to_radians(),
            ..Default::default()
        };
        let mut model = KinematicModel::new(&params).unwrap();
        model.set_target_velocity(1.0);
        model.set_target_steering_angle(30f64.to_radians());
        for _ in 0..400 {
            model.step(0.01);
        }
        let state = model.state();
        assert!(state.theta() > 0.2);
        assert!(state.v() > 0.8);
        assert!(state.x() > 0.5);
        assert!(state.y() > 0.1);
    }

    #[test]
    fn speed_and_steering_are_rate_limited() {
        let mut model = model();
        model.set_target_velocity(5.0);
        model.set_target_steering_angle(0.5);
        let state = model.step(0.1);
        assert_approx_eq!(state.v(), 0.1);
        assert_approx_eq!(state.steering_angle(), FRAC_PI_4 * 0.1);

        model.set_target_steering_angle(10.0);
        for _ in 0..100 {
            model.step(0.1);
        }
        assert_approx_eq!(model.state().steering_angle(), FRAC_PI_4);
        assert_approx_eq!(model.state().v(), 5.0);
    }

    #[test]
    fn set_control_converts_curvature() {
        let mut model = model();
        model.set_control(0.0, 1.0);
        assert_eq!(model.steering_actuator().setpoint(), 0.0);
        assert_eq!(model.speed_actuator().setpoint(), 1.0);

        model.set_control(0.2, 1.0);
        assert_eq!(model.steering_actuator().setpoint(), (0.2f64 * 2.5).atan());

        model.set_control(-0.2, 1.0);
        assert_eq!(model.steering_actuator().setpoint(), (-0.2f64 * 2.5).atan());

        model.set_control(100.0, 1.0);
        assert_approx_eq!(model.steering_actuator().setpoint(), FRAC_PI_4);
    }

    #[test]
    fn front_axle_round_trip() {
        let state = VehicleState::at_pose(1.0, 2.0, PI / 3.0, 2.5);
        let model = KinematicModel::with_state(&VehicleParams::default(), state).unwrap();
        let front = model.front_wheel_position();
        assert_approx_eq!(front.x, model.state().front_x());
        assert_approx_eq!(front.y, model.state().front_y());
        assert_approx_eq!(front.x, 1.0 + 2.5 * 0.5);
        assert_approx_eq!(front.y, 2.0 + 2.5 * (PI / 3.0).sin());

        let mut model = model;
        model.set_control(0.4, 2.0);
        for _ in 0..50 {
            let state = model.step(0.02);
            let front = model.front_wheel_position();
            assert_approx_eq!(front.x, state.front_x());
            assert_approx_eq!(front.y, state.front_y());
        }
    }

    #[test]
    fn projected_path_straight() {
        let state = VehicleState::at_pose(0.0, 0.0, FRAC_PI_4, 2.0);
        let params = VehicleParams {
            wheelbase: 2.0,
            ..Default::default()
        };
        let model = KinematicModel::with_state(&params, state).unwrap();
        let points = model.projected_path(5.0, 6).collect::<Vec<_>>();
        assert_eq!(points.len(), 6);
        assert_approx_eq!(points[0].x, model.state().front_x());
        assert_approx_eq!(points[0].y, model.state().front_y());
        for (i, p) in points.iter().enumerate() {
            let d = p.distance(model.state().front_position());
            assert_approx_eq!(d, i as f64);
            assert_approx_eq!(p.x - model.state().front_x(), p.y - model.state().front_y());
        }
    }

    #[test]
    fn projected_path_arc_radius() {
        let mut model = model();
        model.set_target_steering_angle(0.3);
        for _ in 0..100 {
            model.step(0.01);
        }
        assert_approx_eq!(model.state().steering_angle(), 0.3);

        let path = model.projected_path(3.0, 20);
        let arc = match path.curve() {
            PathShape::Arc(arc) => *arc,
            shape => panic!("expected an arc, found {:?}", shape),
        };
        assert_approx_eq!(arc.length(), 3.0);

        let points = path.clone().collect::<Vec<_>>();
        assert_eq!(points.len(), 20);
        assert_approx_eq!(points[0].x, model.state().front_x());
        assert_approx_eq!(points[0].y, model.state().front_y());
        let rear_radius = model.wheelbase() / 0.3f64.tan();
        let front_radius = model.wheelbase().hypot(rear_radius);
        for p in &points {
            assert_approx_eq!(p.distance(arc.centre()), front_radius);
        }
        // Turning left, so the path bends to positive y
        assert!(points[19].y > points[0].y);

        // Restarting yields the same points
        assert_eq!(path.collect::<Vec<_>>(), points);
    }

    #[test]
    fn projected_path_turns_right_with_negative_steering() {
        let mut model = model();
        model.set_target_steering_angle(-0.3);
        for _ in 0..100 {
            model.step(0.01);
        }
        let points = model.projected_path(3.0, 10).collect::<Vec<_>>();
        assert!(points[9].y < points[0].y);
    }

    #[test]
    fn projected_path_small_steering_is_straight() {
        let mut model = model();
        model.set_target_steering_angle(0.005);
        model.step(1.0);
        assert!(matches!(model.projected_path(1.0, 2).curve(), PathShape::Straight(_)));
        assert_eq!(model.projected_path(1.0, 0).count(), 0);
        assert_eq!(model.projected_path(1.0, 1).count(), 1);
    }
}
