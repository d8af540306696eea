//! Pure pursuit path tracking for a kinematic bicycle model.
//!
//! A [KinematicModel] integrates a vehicle with rate-limited speed and steering,
//! a [PurePursuit] controller steers it along a piecewise-linear [Track], and a
//! [Simulation] closes the loop between the two.

pub use actuator::RateLimitedActuator;
pub use cgmath;
pub use config::{ConfigError, SimulationConfig};
pub use controller::{
    ArcLengthLookahead, Command, ControlError, ControllerParams, PurePursuit, SteeringLaw, Target,
    TargetSelection, TrackingPhase, WaypointProgression,
};
#[cfg(feature = "debug")]
pub use debug::take_debug_frame;
pub use simulation::{timeout_steps, Frame, Outcome, Simulation, SimulationLog};
pub use track::{Lookahead, Projection, Track, TrackError, WaypointProgress};
pub use util::Interval;
pub use vehicle::{
    KinematicModel, ModelError, PathShape, ProjectedPath, VehicleParams, VehicleState,
};

mod actuator;
mod config;
mod controller;
mod debug;
pub mod math;
mod simulation;
mod track;
mod util;
mod vehicle;
