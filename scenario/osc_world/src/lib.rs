//! OSC World - The boundary between the storyboard interpreter and a simulator.
//!
//! The interpreter never owns entity state. It reads the world through
//! [`WorldQuery`] and commands it through [`ActionApplication`]; a [`Simulation`]
//! is both, plus a clock.
//!
//! [`KinematicWorld`] is a small reference simulator on a [`StraightRoad`], used by
//! the command line runner and by tests.

mod apply;
pub mod distance;
mod kinematic;
mod query;
mod road;
mod simulation;

pub use apply::{
    ActionApplication, ApplyError, DynamicConstraints, Instruction, LaneChangeRequest,
    SpeedRequest,
};
pub use kinematic::{
    AppliedInstruction, KinematicWorld, DEFAULT_ACCELERATION, DEFAULT_LATERAL_VELOCITY,
    STAND_STILL_SPEED,
};
pub use query::{DistanceOptions, EntityStatus, LaneBoundDistances, WorldQuery};
pub use road::StraightRoad;
pub use simulation::Simulation;
