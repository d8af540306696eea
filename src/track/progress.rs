use super::Track;
use crate::math::Point2d;
use serde::{Deserialize, Serialize};

/// How far a vehicle has progressed through a track's waypoints.
///
/// This is session state owned by whoever is following the track, so a single
/// [Track] can be followed by any number of vehicles at once. It is advanced
/// with [Track::advance_progress].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaypointProgress {
    /// Index of the waypoint being driven towards, or `None` before the
    /// first update.
    next: Option<usize>,
}

impl WaypointProgress {
    /// A progression which has not yet been advanced.
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn at(next: usize) -> Self {
        Self { next: Some(next) }
    }

    /// Index of the waypoint being driven towards. May equal the length of the
    /// track once every waypoint has been reached.
    pub fn next_index(&self) -> Option<usize> {
        self.next
    }

    /// Whether every waypoint of `track` has been reached.
    pub fn is_complete(&self, track: &Track) -> bool {
        matches!(self.next, Some(next) if next >= track.len())
    }

    /// The waypoint being driven towards, if there is one.
    pub fn target(&self, track: &Track) -> Option<Point2d> {
        self.next.and_then(|next| track.waypoints().get(next).copied())
    }
}
