use super::curve::ParametricCurve2d;
use super::{Point2d, Vector2d};
use crate::util::Interval;
use cgmath::prelude::*;
use serde::{Deserialize, Serialize};

/// A straight line segment, parameterised by arc length from its start.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineSegment2d {
    start: Point2d,
    end: Point2d,
}

/// The closest point on a segment to some other point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentProjection {
    /// The closest point on the segment.
    pub point: Point2d,
    /// Distance from the segment start to `point`, in m.
    pub distance_along: f64,
    /// Distance from the queried point to `point`, in m.
    pub distance: f64,
}

impl LineSegment2d {
    /// Creates a segment between two points.
    pub const fn from_ends(start: Point2d, end: Point2d) -> Self {
        Self { start, end }
    }

    /// The first end of the segment.
    pub fn start(&self) -> Point2d {
        self.start
    }

    /// The second end of the segment.
    pub fn end(&self) -> Point2d {
        self.end
    }

    /// The vector from the start to the end of the segment.
    pub fn delta(&self) -> Vector2d {
        self.end - self.start
    }

    /// The length of the segment.
    pub fn length(&self) -> f64 {
        self.delta().magnitude()
    }

    /// Whether the ends of the segment coincide.
    pub fn is_degenerate(&self) -> bool {
        self.delta().magnitude2() == 0.0
    }

    /// Finds the point on the segment closest to `point`.
    ///
    /// The projection is clamped to the ends of the segment. A degenerate
    /// segment projects everything onto its start.
    pub fn project(&self, point: Point2d) -> SegmentProjection {
        let delta = self.delta();
        let length2 = delta.magnitude2();
        let t = if length2 > 0.0 {
            ((point - self.start).dot(delta) / length2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let closest = self.start + t * delta;
        SegmentProjection {
            point: closest,
            distance_along: t * length2.sqrt(),
            distance: (point - closest).magnitude(),
        }
    }

    /// The point `distance` metres from the start of the segment.
    ///
    /// A degenerate segment always returns its start.
    pub fn point_at(&self, distance: f64) -> Point2d {
        let length = self.length();
        if length > 0.0 {
            self.start + self.delta() * (distance / length)
        } else {
            self.start
        }
    }
}

impl ParametricCurve2d for LineSegment2d {
    fn sample(&self, t: f64) -> Point2d {
        self.point_at(t)
    }

    fn bounds(&self) -> Interval<f64> {
        Interval::new(0.0, self.length())
    }

    fn sample_dt(&self, _t: f64) -> Vector2d {
        if self.is_degenerate() {
            Vector2d::zero()
        } else {
            self.delta().normalize()
        }
    }
}
