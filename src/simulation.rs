use crate::config::SimulationConfig;
use crate::controller::{ArcLengthLookahead, Command, ControlError, PurePursuit, TargetSelection};
use crate::debug::debug_path;
#[cfg(feature = "debug")]
use crate::debug::take_debug_frame;
use crate::math::Point2d;
use crate::track::Track;
use crate::vehicle::{KinematicModel, ModelError, VehicleState};
use log::{info, warn};
use serde::Serialize;

/// A closed control loop of one vehicle following one track.
///
/// Each [step](Self::step) runs the controller on the current state, feeds the
/// command to the vehicle model and integrates it.
#[derive(Clone, Debug)]
pub struct Simulation<'t, S = ArcLengthLookahead> {
    /// The vehicle being driven.
    model: KinematicModel,
    /// The controller driving it.
    controller: PurePursuit<'t, S>,
    /// The integration time step in s.
    dt: f64,
    /// Distance and number of points of the projected path recorded in each frame.
    projection: Option<(f64, usize)>,
    /// The number of steps taken.
    frame: usize,
    /// Debugging information from the previously simulated frame.
    #[cfg(feature = "debug")]
    debug: serde_json::Value,
}

/// What happened during one step of a [Simulation].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    /// The vehicle state after the step.
    pub state: VehicleState,
    /// The command issued during the step.
    pub command: Command,
    /// The projected path of the front axle, if recording was requested.
    pub projected_path: Option<Vec<Point2d>>,
}

/// How a [Simulation::run] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The end of the track was reached.
    Completed,
    /// The step limit was reached first.
    TimedOut,
}

/// The record of a [Simulation::run].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationLog {
    pub frames: Vec<Frame>,
    pub outcome: Outcome,
}

/// The number of steps after which a run is abandoned: the time to cover the
/// track at the target speed, multiplied by `factor`, in steps of `dt`.
///
/// Returns `None` unless the speed, time step and factor are finite and
/// positive, since the run would then never end or end immediately.
pub fn timeout_steps(
    track_length: f64,
    target_speed: f64,
    dt: f64,
    factor: f64,
) -> Option<usize> {
    let usable = |value: f64| value.is_finite() && value > 0.0;
    if !(usable(target_speed) && usable(dt) && usable(factor)) {
        return None;
    }
    let steps = (track_length / target_speed * factor / dt).ceil();
    (steps.is_finite() && steps >= 0.0).then(|| steps as usize)
}

impl<'t> Simulation<'t> {
    /// Sets up a simulation from a config, starting the vehicle at rest at the
    /// first waypoint, facing along the first segment.
    pub fn from_config(config: &SimulationConfig, track: &'t Track) -> Result<Self, ModelError> {
        let start = track.first();
        let heading = track
            .segments()
            .map(|seg| seg.delta())
            .find(|delta| delta.x != 0.0 || delta.y != 0.0)
            .map_or(0.0, |delta| delta.y.atan2(delta.x));
        let state = VehicleState::at_pose(start.x, start.y, heading, config.vehicle.wheelbase);
        let model = KinematicModel::with_state(&config.vehicle, state)?;

        let mut controller = PurePursuit::new(config.controller);
        controller.set_track(track);
        Ok(Self::new(model, controller, config.dt))
    }
}

impl<'t, S: TargetSelection> Simulation<'t, S> {
    /// Creates a simulation with the given time step in s.
    pub fn new(model: KinematicModel, controller: PurePursuit<'t, S>, dt: f64) -> Self {
        Self {
            model,
            controller,
            dt,
            projection: None,
            frame: 0,
            #[cfg(feature = "debug")]
            debug: serde_json::Value::Null,
        }
    }

    /// Records the projected path over `distance` metres as `num_points`
    /// points in every subsequent frame.
    pub fn record_projected_path(&mut self, distance: f64, num_points: usize) {
        self.projection = Some((distance, num_points));
    }

    pub fn model(&self) -> &KinematicModel {
        &self.model
    }

    pub fn controller(&self) -> &PurePursuit<'t, S> {
        &self.controller
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Whether the controller has reached the end of its track.
    pub fn is_complete(&self) -> bool {
        self.controller.is_complete()
    }

    /// Runs one control cycle and, unless the track is complete, advances the
    /// vehicle by one time step.
    pub fn step(&mut self) -> Result<Frame, ControlError> {
        let command = self.controller.control(self.model.state())?;
        let state = if command.track_complete {
            *self.model.state()
        } else {
            self.model.set_control(command.curvature, command.velocity);
            self.model.step(self.dt)
        };
        self.frame += 1;

        let projected_path = self.projection.map(|(distance, num_points)| {
            let path = self.model.projected_path(distance, num_points).collect::<Vec<_>>();
            debug_path("projected_path", &path);
            path
        });

        #[cfg(feature = "debug")]
        {
            self.debug = take_debug_frame();
        }

        Ok(Frame {
            state,
            command,
            projected_path,
        })
    }

    /// Steps until the track is complete or `max_steps` steps have been taken.
    pub fn run(&mut self, max_steps: usize) -> Result<SimulationLog, ControlError> {
        let mut frames = Vec::new();
        for _ in 0..max_steps {
            let frame = self.step()?;
            let complete = frame.command.track_complete;
            frames.push(frame);
            if complete {
                let state = self.model.state();
                info!(
                    "track complete after {} steps, t = {:.2} s, at ({:.2}, {:.2})",
                    self.frame,
                    state.time(),
                    state.x(),
                    state.y()
                );
                return Ok(SimulationLog {
                    frames,
                    outcome: Outcome::Completed,
                });
            }
        }

        warn!("simulation timed out after {} steps", max_steps);
        Ok(SimulationLog {
            frames,
            outcome: Outcome::TimedOut,
        })
    }

    /// Runs with a step limit of [timeout_steps] for the current track.
    ///
    /// Fails without stepping if the target speed, time step or `factor` is
    /// not finite and positive.
    pub fn run_with_timeout(&mut self, factor: f64) -> Result<SimulationLog, ControlError> {
        let track = self.controller.track().ok_or(ControlError::NoTrack)?;
        let target_speed = self.controller.params().target_speed;
        let max_steps = timeout_steps(track.length(), target_speed, self.dt, factor)
            .ok_or_else(|| {
                let (name, value) = [
                    ("target_speed", target_speed),
                    ("dt", self.dt),
                    ("timeout_factor", factor),
                ]
                .into_iter()
                .find(|(_, value)| !(value.is_finite() && *value > 0.0))
                .unwrap_or(("target_speed", target_speed));
                ControlError::InvalidParameter { name, value }
            })?;
        self.run(max_steps)
    }

    /// Gets the debugging information for the previously simulated frame as JSON array.
    #[cfg(feature = "debug")]
    pub fn debug(&self) -> serde_json::Value {
        self.debug.clone()
    }
}
