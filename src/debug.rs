//! Geometry recorded for visual debugging, enabled by the `debug` feature.
//!
//! Without the feature every recording call is a no-op.

use crate::math::Point2d;
#[cfg(feature = "debug")]
use serde_json::{json, Value};

#[cfg(feature = "debug")]
thread_local!(
    static DEBUG_FRAME: std::cell::RefCell<Vec<Value>> = Default::default();
);

#[cfg(feature = "debug")]
fn record(primitive: Value) {
    DEBUG_FRAME.with(|frame| frame.borrow_mut().push(primitive));
}

/// Records a line from `p1` to `p2`.
#[allow(unused)]
pub fn debug_line(name: &str, p1: Point2d, p2: Point2d) {
    #[cfg(feature = "debug")]
    record(json!({
        "type": "line",
        "name": name,
        "points": [[p1.x, p1.y], [p2.x, p2.y]],
    }));
}

#[allow(unused)]
pub fn debug_circle(name: &str, centre: Point2d, radius: f64) {
    #[cfg(feature = "debug")]
    record(json!({
        "type": "circle",
        "name": name,
        "centre": [centre.x, centre.y],
        "radius": radius,
    }));
}

/// Records a polyline through `points`.
#[allow(unused)]
pub fn debug_path(name: &str, points: &[Point2d]) {
    #[cfg(feature = "debug")]
    record(json!({
        "type": "path",
        "name": name,
        "points": points.iter().map(|p| [p.x, p.y]).collect::<Vec<_>>(),
    }));
}

/// Drains the geometry recorded on this thread since the last call, as a
/// JSON array.
#[cfg(feature = "debug")]
pub fn take_debug_frame() -> Value {
    Value::Array(DEBUG_FRAME.with(|frame| frame.take()))
}

#[cfg(all(test, feature = "debug"))]
mod test {
    use super::*;

    #[test]
    fn frame_is_drained() {
        take_debug_frame();
        debug_line("heading", Point2d::new(0.0, 0.0), Point2d::new(1.0, 0.0));
        debug_circle("lookahead", Point2d::new(0.0, 0.0), 0.5);
        debug_path("projected_path", &[Point2d::new(0.0, 0.0), Point2d::new(0.5, 0.1)]);

        let frame = take_debug_frame();
        assert_eq!(frame.as_array().map(Vec::len), Some(3));
        assert_eq!(frame[0]["type"], "line");
        assert_eq!(frame[0]["points"][1][0], 1.0);
        assert_eq!(frame[1]["radius"], 0.5);
        assert_eq!(frame[2]["points"].as_array().map(Vec::len), Some(2));
        assert_eq!(take_debug_frame(), json!([]));
    }
}
