//! Mathematical structs and functions.

use cgmath::{Point2, Vector2};
pub use arc::CircularArc2d;
pub use curve::{CurveSamples, ParametricCurve2d};
pub use segment::{LineSegment2d, SegmentProjection};
pub use util::*;

mod arc;
mod curve;
mod segment;
mod util;

/// A 2D point
pub type Point2d = Point2<f64>;

/// A 2D vector
pub type Vector2d = Vector2<f64>;
