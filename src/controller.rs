use crate::debug::{debug_circle, debug_line};
use crate::math::{project_local, rot90, Point2d};
use crate::track::Track;
use crate::vehicle::VehicleState;
use cgmath::prelude::*;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use selection::{ArcLengthLookahead, Target, TargetSelection, WaypointProgression};

mod selection;

/// Tuning parameters of a [PurePursuit] controller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerParams {
    /// Arc length ahead of the vehicle's projection onto the track at which
    /// the target point is placed, in m.
    pub look_ahead_distance: f64,
    /// Length of the heading vector reported as the future position, in m.
    pub velocity_vector_length: f64,
    /// Gain of the proportional steering law.
    pub proportional_gain: f64,
    /// The commanded speed while tracking, in m/s.
    pub target_speed: f64,
    /// How the curvature command is computed.
    pub steering_law: SteeringLaw,
}

/// How a [PurePursuit] controller turns the target into a curvature command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SteeringLaw {
    /// `gain * (0 - angle_error)`. Linear in the angle error.
    ///
    /// `angle_error` is positive when the target lies to the right, the
    /// opposite of measuring the target's bearing from the heading. With that
    /// sign a target on the left gives positive (left) curvature.
    #[default]
    Proportional,
    /// The geometric pure pursuit law `2 sin(alpha) / d`, where `alpha` is the
    /// bearing of the target and `d` its distance. Ignores the gain.
    Classical,
}

/// Whether a controller is still following its track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TrackingPhase {
    Tracking,
    /// The end of the track has been reached. Terminal until a new track is set.
    Complete,
}

/// The output of one control cycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Command {
    /// Path curvature in 1/m, positive to the left.
    pub curvature: f64,
    /// Speed in m/s.
    pub velocity: f64,
    /// The point being steered towards.
    pub target_point: Point2d,
    /// The vehicle position pushed ahead along its heading.
    pub future_position: Point2d,
    /// Heading relative to the direction of the target, in rad. Positive
    /// when the target lies to the right.
    pub angle_error: f64,
    /// Whether the end of the track has been reached.
    pub track_complete: bool,
}

/// An error raised by a [PurePursuit] controller or its parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    #[error("No track set, call `set_track` first")]
    NoTrack,

    #[error("Parameter `{name}` must be finite and positive, found {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// A pure pursuit path tracking controller.
///
/// Each cycle picks a target point on the track with its [TargetSelection]
/// strategy and steers the vehicle's heading towards it. The track is
/// borrowed, never modified, so any number of controllers may follow it.
#[derive(Clone, Debug)]
pub struct PurePursuit<'t, S = ArcLengthLookahead> {
    params: ControllerParams,
    selection: S,
    track: Option<&'t Track>,
    phase: TrackingPhase,
}

impl Default for ControllerParams {
    fn default() -> Self {
        Self {
            look_ahead_distance: 0.2,
            velocity_vector_length: 0.1,
            proportional_gain: 1.0,
            target_speed: 0.1,
            steering_law: SteeringLaw::Proportional,
        }
    }
}

impl ControllerParams {
    /// Checks that every setting is finite, and that the lookahead distance and
    /// target speed are positive.
    pub fn validate(&self) -> Result<(), ControlError> {
        let Self {
            look_ahead_distance,
            velocity_vector_length,
            proportional_gain,
            target_speed,
            ..
        } = *self;

        [
            ("look_ahead_distance", look_ahead_distance, true),
            ("velocity_vector_length", velocity_vector_length, false),
            ("proportional_gain", proportional_gain, false),
            ("target_speed", target_speed, true),
        ]
        .into_iter()
        .find(|(_, value, positive)| !value.is_finite() || (*positive && *value <= 0.0))
        .map_or(Ok(()), |(name, value, _)| {
            Err(ControlError::InvalidParameter { name, value })
        })
    }
}

impl Command {
    /// The zero command issued once the track is complete.
    fn stop(position: Point2d) -> Self {
        Self {
            curvature: 0.0,
            velocity: 0.0,
            target_point: position,
            future_position: position,
            angle_error: 0.0,
            track_complete: true,
        }
    }
}

impl<'t> PurePursuit<'t> {
    /// Creates a controller which looks a fixed arc length along the track.
    pub fn new(params: ControllerParams) -> Self {
        Self::with_selection(params, ArcLengthLookahead)
    }
}

impl<'t, S: TargetSelection> PurePursuit<'t, S> {
    /// Creates a controller with the given target selection strategy.
    pub fn with_selection(params: ControllerParams, selection: S) -> Self {
        Self {
            params,
            selection,
            track: None,
            phase: TrackingPhase::Tracking,
        }
    }

    pub fn params(&self) -> &ControllerParams {
        &self.params
    }

    pub fn selection(&self) -> &S {
        &self.selection
    }

    /// The track being followed.
    pub fn track(&self) -> Option<&'t Track> {
        self.track
    }

    pub fn phase(&self) -> TrackingPhase {
        self.phase
    }

    /// Whether the end of the track has been reached.
    pub fn is_complete(&self) -> bool {
        self.phase == TrackingPhase::Complete
    }

    /// Starts following a new track from the beginning.
    pub fn set_track(&mut self, track: &'t Track) {
        debug!("following track of {} waypoints", track.len());
        self.track = Some(track);
        self.selection.reset();
        self.phase = TrackingPhase::Tracking;
    }

    /// Runs one control cycle for the vehicle in `state`.
    ///
    /// Once the track is complete, every cycle returns a zero command at the
    /// vehicle's position.
    pub fn control(&mut self, state: &VehicleState) -> Result<Command, ControlError> {
        let track = self.track.ok_or(ControlError::NoTrack)?;
        let position = state.position();

        if self.phase == TrackingPhase::Complete {
            return Ok(Command::stop(position));
        }

        let target = self
            .selection
            .select(track, position, self.params.look_ahead_distance);
        if target.complete {
            debug!(
                "track complete at ({:.2}, {:.2}), t = {:.2} s",
                position.x,
                position.y,
                state.time()
            );
            self.phase = TrackingPhase::Complete;
            return Ok(Command::stop(position));
        }

        let heading = state.heading_vector();
        let future_position = position + self.params.velocity_vector_length * heading;

        // Target in the vehicle frame: x forward, y to the left
        let local = project_local(target.point, position, heading, rot90(heading));
        let bearing = local.y.atan2(local.x);
        let angle_error = -bearing;

        let curvature = match self.params.steering_law {
            SteeringLaw::Proportional => self.proportional_control(0.0, angle_error),
            SteeringLaw::Classical => {
                let distance = target.point.distance(position);
                if distance > 0.0 {
                    2.0 * bearing.sin() / distance
                } else {
                    0.0
                }
            }
        };

        debug_circle("lookahead", position, self.params.look_ahead_distance);
        debug_line("target", position, target.point);
        debug_line("heading", position, future_position);
        trace!(
            "target ({:.3}, {:.3}), angle error {:.4} rad, curvature {:.4}",
            target.point.x,
            target.point.y,
            angle_error,
            curvature
        );

        Ok(Command {
            curvature,
            velocity: self.params.target_speed,
            target_point: target.point,
            future_position,
            angle_error,
            track_complete: false,
        })
    }

    fn proportional_control(&self, target: f64, current: f64) -> f64 {
        self.params.proportional_gain * (target - current)
    }
}
