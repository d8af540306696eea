use super::{Point2d, Vector2d};
use cgmath::prelude::*;

/// Projects a point onto a local coordinate system.
///
/// # Parameters
/// * `point` - The point to project
/// * `origin` - The origin of the coordinate system
/// * `x_axis` - The basis vector pointing in the positive x-axis.
/// * `y_axis` - The basis vector pointing in the positive y-axis.
pub fn project_local(
    point: Point2d,
    origin: Point2d,
    x_axis: Vector2d,
    y_axis: Vector2d,
) -> Point2d {
    let point = point - origin;
    Point2d::new(point.dot(x_axis), point.dot(y_axis))
}

/// Rotates a vector 90 degrees counter-clockwise.
pub fn rot90(vec: Vector2d) -> Vector2d {
    Vector2d::new(-vec.y, vec.x)
}

/// A unit vector pointing along the given heading in radians.
pub fn heading_vector(theta: f64) -> Vector2d {
    Vector2d::new(theta.cos(), theta.sin())
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn project_onto_rotated_frame() {
        let x_axis = heading_vector(FRAC_PI_2);
        let p = project_local(
            Point2d::new(1.0, 3.0),
            Point2d::new(1.0, 1.0),
            x_axis,
            rot90(x_axis),
        );
        assert_approx_eq!(p.x, 2.0);
        assert_approx_eq!(p.y, 0.0);
    }
}
