use super::{Point2d, Vector2d};
use crate::util::Interval;

/// A parametric curve in 2D space.
pub trait ParametricCurve2d {
    /// Samples the parametric curve.
    fn sample(&self, t: f64) -> Point2d;

    /// Returns the minimum and maximum t-values that define the bounds of the curve.
    fn bounds(&self) -> Interval<f64>;

    /// Samples the derivative of the parametric curve.
    ///
    /// The default implementation approximates the derivative by sampling
    /// two very nearby points along the curve.
    fn sample_dt(&self, t: f64) -> Vector2d {
        let delta = self.bounds().length() * 0.0001;
        let p1 = self.sample(t);
        let p2 = self.sample(t + delta);
        (p2 - p1) / delta
    }

    /// Samples `count` points spread evenly over the bounds of the curve,
    /// including both ends.
    fn samples(self, count: usize) -> CurveSamples<Self>
    where
        Self: Sized,
    {
        CurveSamples {
            curve: self,
            count,
            next: 0,
        }
    }
}

impl<T: ParametricCurve2d + ?Sized> ParametricCurve2d for &T {
    fn sample(&self, t: f64) -> Point2d {
        (**self).sample(t)
    }

    fn bounds(&self) -> Interval<f64> {
        (**self).bounds()
    }

    fn sample_dt(&self, t: f64) -> Vector2d {
        (**self).sample_dt(t)
    }
}

/// Evenly spaced samples along a curve. See [ParametricCurve2d::samples].
///
/// The iterator is finite, and cloning it yields an independent iterator
/// that continues independently from the same position.
#[derive(Clone, Debug)]
pub struct CurveSamples<C> {
    curve: C,
    count: usize,
    next: usize,
}

impl<C: ParametricCurve2d> CurveSamples<C> {
    /// The curve being sampled.
    pub fn curve(&self) -> &C {
        &self.curve
    }

    fn param(&self, idx: usize) -> f64 {
        let fraction = match self.count {
            0 | 1 => 0.0,
            n => idx as f64 / (n - 1) as f64,
        };
        self.curve.bounds().lerp(fraction)
    }
}

impl<C: ParametricCurve2d> Iterator for CurveSamples<C> {
    type Item = Point2d;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let t = self.param(self.next);
        self.next += 1;
        Some(self.curve.sample(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.next;
        (left, Some(left))
    }
}

impl<C: ParametricCurve2d> ExactSizeIterator for CurveSamples<C> {}
