use super::curve::ParametricCurve2d;
use super::{heading_vector, rot90, Point2d, Vector2d};
use crate::util::Interval;
use serde::{Deserialize, Serialize};

/// An arc of a circle, parameterised by arc length from its start.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircularArc2d {
    centre: Point2d,
    radius: f64,
    start_angle: f64,
    /// Signed angle swept by the arc, positive counter-clockwise.
    sweep: f64,
}

impl CircularArc2d {
    /// Creates an arc about `centre` starting at `start_angle` (measured from the
    /// positive x-axis) and sweeping through `sweep` radians.
    pub fn new(centre: Point2d, radius: f64, start_angle: f64, sweep: f64) -> Self {
        Self {
            centre,
            radius,
            start_angle,
            sweep,
        }
    }

    /// Creates the arc that starts at `start` and runs `length` metres around
    /// `centre`, turning counter-clockwise if `ccw` is set.
    pub fn through(centre: Point2d, start: Point2d, length: f64, ccw: bool) -> Self {
        let radial = start - centre;
        let radius = radial.x.hypot(radial.y);
        let start_angle = radial.y.atan2(radial.x);
        let sweep = if radius > 0.0 { length / radius } else { 0.0 };
        Self::new(
            centre,
            radius,
            start_angle,
            if ccw { sweep } else { -sweep },
        )
    }

    /// The centre of the circle.
    pub fn centre(&self) -> Point2d {
        self.centre
    }

    /// The radius of the circle.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The signed angle swept by the arc.
    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    /// The length of the arc.
    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    fn angle_at(&self, t: f64) -> f64 {
        if self.radius > 0.0 {
            self.start_angle + self.sweep.signum() * t / self.radius
        } else {
            self.start_angle
        }
    }
}

impl ParametricCurve2d for CircularArc2d {
    fn sample(&self, t: f64) -> Point2d {
        self.centre + self.radius * heading_vector(self.angle_at(t))
    }

    fn bounds(&self) -> Interval<f64> {
        Interval::new(0.0, self.length())
    }

    fn sample_dt(&self, t: f64) -> Vector2d {
        self.sweep.signum() * rot90(heading_vector(self.angle_at(t)))
    }
}
