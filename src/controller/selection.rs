//! Strategies for choosing the point a controller steers towards.

use crate::math::Point2d;
use crate::track::{Track, WaypointProgress};
use log::debug;

/// The point a controller should steer towards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    /// The target point.
    pub point: Point2d,
    /// Whether the end of the track has been reached.
    pub complete: bool,
}

/// A strategy for picking a target point on a track.
///
/// Implementations own whatever progression state they need, so each
/// controller carries its own and the track itself is never modified.
pub trait TargetSelection {
    /// Picks a target for a vehicle at `position`.
    fn select(&mut self, track: &Track, position: Point2d, lookahead_distance: f64) -> Target;

    /// Forgets any progression state, e.g. when a new track is assigned.
    fn reset(&mut self) {}
}

/// Projects the vehicle onto the closest track segment and walks a fixed
/// arc length ahead of that point.
///
/// Stateless, and independent of the control rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArcLengthLookahead;

impl TargetSelection for ArcLengthLookahead {
    fn select(&mut self, track: &Track, position: Point2d, lookahead_distance: f64) -> Target {
        let proj = track.project(position);
        let ahead = track.lookahead(proj.segment_index, proj.distance_along, lookahead_distance);
        Target {
            point: ahead.point,
            complete: ahead.complete,
        }
    }
}

/// Steers at waypoints one after another, moving on once the vehicle is closer
/// to the next waypoint than to the one it is leaving.
///
/// The lookahead distance is not used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaypointProgression {
    progress: WaypointProgress,
}

impl WaypointProgression {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current progression through the track.
    pub fn progress(&self) -> WaypointProgress {
        self.progress
    }
}

impl TargetSelection for WaypointProgression {
    fn select(&mut self, track: &Track, position: Point2d, _lookahead_distance: f64) -> Target {
        let progress = track.advance_progress(self.progress, position);
        if progress != self.progress {
            debug!("waypoint target advanced to {:?}", progress.next_index());
        }
        self.progress = progress;

        match progress.target(track) {
            Some(point) => Target {
                point,
                complete: false,
            },
            None => Target {
                point: track.last(),
                complete: true,
            },
        }
    }

    fn reset(&mut self) {
        self.progress = WaypointProgress::new();
    }
}
