use crate::math::{CircularArc2d, LineSegment2d, ParametricCurve2d, Point2d, Vector2d};
use crate::util::Interval;

/// The path the front axle would trace if the steering angle were held.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathShape {
    /// The vehicle is (nearly) steering straight ahead.
    Straight(LineSegment2d),
    /// The vehicle is turning about its instantaneous centre of rotation.
    Arc(CircularArc2d),
}

impl ParametricCurve2d for PathShape {
    fn sample(&self, t: f64) -> Point2d {
        match self {
            PathShape::Straight(seg) => seg.sample(t),
            PathShape::Arc(arc) => arc.sample(t),
        }
    }

    fn bounds(&self) -> Interval<f64> {
        match self {
            PathShape::Straight(seg) => seg.bounds(),
            PathShape::Arc(arc) => arc.bounds(),
        }
    }

    fn sample_dt(&self, t: f64) -> Vector2d {
        match self {
            PathShape::Straight(seg) => seg.sample_dt(t),
            PathShape::Arc(arc) => arc.sample_dt(t),
        }
    }
}
