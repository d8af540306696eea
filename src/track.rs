use crate::math::{LineSegment2d, Point2d};
use cgmath::prelude::*;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::ops::Index;
use thiserror::Error;

pub use progress::WaypointProgress;

mod progress;

/// A piecewise-linear path through a sequence of waypoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point2d>", into = "Vec<Point2d>")]
pub struct Track {
    /// The waypoints; always at least two.
    waypoints: Vec<Point2d>,
}

/// An error raised when building a [Track].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackError {
    #[error("A track must contain at least 2 waypoints, found {0}")]
    TooFewWaypoints(usize),
}

/// The closest point on a track to some position. See [Track::project].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Index of the closest segment, which runs from waypoint `segment_index`
    /// to waypoint `segment_index + 1`.
    pub segment_index: usize,
    /// The closest point on that segment.
    pub point: Point2d,
    /// Distance from the start of the segment to `point`, in m.
    pub distance_along: f64,
    /// Distance from the queried position to `point`, in m.
    pub distance: f64,
}

/// A point some distance ahead along a track. See [Track::lookahead].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lookahead {
    /// The target point.
    pub point: Point2d,
    /// Whether the walk ran off the end of the track.
    pub complete: bool,
}

impl Track {
    /// Creates a track from a sequence of waypoints.
    ///
    /// Waypoints may be anything convertible to a point, such as `(x, y)` tuples.
    pub fn new<P: Into<Point2d>>(waypoints: impl IntoIterator<Item = P>) -> Result<Self, TrackError> {
        let waypoints = waypoints.into_iter().map(Into::into).collect::<Vec<_>>();
        if waypoints.len() < 2 {
            return Err(TrackError::TooFewWaypoints(waypoints.len()));
        }
        Ok(Self { waypoints })
    }

    /// Appends a waypoint to the end of the track.
    pub fn push(&mut self, waypoint: impl Into<Point2d>) {
        self.waypoints.push(waypoint.into());
    }

    /// The number of waypoints.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false; tracks have at least two waypoints.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// The waypoints in order.
    pub fn waypoints(&self) -> &[Point2d] {
        &self.waypoints
    }

    /// The first waypoint.
    pub fn first(&self) -> Point2d {
        self.waypoints[0]
    }

    /// The final waypoint.
    pub fn last(&self) -> Point2d {
        self.waypoints[self.waypoints.len() - 1]
    }

    /// The number of segments, one fewer than the number of waypoints.
    pub fn num_segments(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// The segment running from waypoint `idx` to waypoint `idx + 1`.
    pub fn segment(&self, idx: usize) -> Option<LineSegment2d> {
        let start = *self.waypoints.get(idx)?;
        let end = *self.waypoints.get(idx + 1)?;
        Some(LineSegment2d::from_ends(start, end))
    }

    /// The segments of the track in order.
    pub fn segments(&self) -> impl Iterator<Item = LineSegment2d> + '_ {
        self.waypoints
            .iter()
            .copied()
            .tuple_windows()
            .map(|(start, end)| LineSegment2d::from_ends(start, end))
    }

    /// The total length of the track in m.
    pub fn length(&self) -> f64 {
        self.segments().map(|seg| seg.length()).sum()
    }

    /// Finds the point on the track closest to `point`.
    ///
    /// Each segment is projected onto with clamping to its ends. When several
    /// segments are equally close, the earliest one wins.
    pub fn project(&self, point: Point2d) -> Projection {
        // Tracks always hold at least one segment
        let first = LineSegment2d::from_ends(self.waypoints[0], self.waypoints[1]).project(point);
        let (best_idx, best) = self
            .segments()
            .map(|seg| seg.project(point))
            .enumerate()
            .skip(1)
            .fold((0, first), |best, candidate| {
                if candidate.1.distance < best.1.distance {
                    candidate
                } else {
                    best
                }
            });

        Projection {
            segment_index: best_idx,
            point: best.point,
            distance_along: best.distance_along,
            distance: best.distance,
        }
    }

    /// Walks `lookahead_distance` metres forward along the track from a
    /// position given as a segment index and distance along that segment.
    ///
    /// If the walk reaches the final waypoint before the distance is used up,
    /// the final waypoint is returned and the lookahead is marked complete.
    pub fn lookahead(
        &self,
        segment_index: usize,
        distance_along: f64,
        lookahead_distance: f64,
    ) -> Lookahead {
        let end = Lookahead {
            point: self.last(),
            complete: true,
        };

        let mut remaining = lookahead_distance;
        let mut along = distance_along;
        for seg in self.segments().skip(segment_index) {
            let length = seg.length();
            let remaining_in_segment = length - along;
            if remaining <= remaining_in_segment {
                return Lookahead {
                    point: seg.point_at(along + remaining),
                    complete: false,
                };
            }
            remaining -= remaining_in_segment;
            along = 0.0;
        }

        end
    }

    /// Advances a discrete waypoint progression for a vehicle at `position`.
    ///
    /// A fresh progression starts by targeting the waypoint after the closest
    /// one. After that the target moves on whenever `position` is strictly
    /// closer to it than to the waypoint before it. The target never moves
    /// backwards, and passes the end of the track once the final waypoint
    /// has been reached.
    pub fn advance_progress(
        &self,
        progress: WaypointProgress,
        position: Point2d,
    ) -> WaypointProgress {
        let mut next = match progress.next_index() {
            Some(next) => next,
            None => self.closest_waypoint(position) + 1,
        };

        while next < self.len()
            && position.distance(self.waypoints[next]) < position.distance(self.waypoints[next - 1])
        {
            next += 1;
        }

        WaypointProgress::at(next)
    }

    /// Index of the waypoint closest to `point`, preferring the earliest on ties.
    fn closest_waypoint(&self, point: Point2d) -> usize {
        let mut best = (0, f64::INFINITY);
        for (idx, waypoint) in self.waypoints.iter().enumerate() {
            let distance = point.distance(*waypoint);
            if distance < best.1 {
                best = (idx, distance);
            }
        }
        best.0
    }
}

impl Index<usize> for Track {
    type Output = Point2d;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.waypoints[idx]
    }
}

impl TryFrom<Vec<Point2d>> for Track {
    type Error = TrackError;

    fn try_from(waypoints: Vec<Point2d>) -> Result<Self, Self::Error> {
        Self::new(waypoints)
    }
}

impl From<Track> for Vec<Point2d> {
    fn from(track: Track) -> Self {
        track.waypoints
    }
}
