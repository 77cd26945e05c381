//! Action-Application boundary.

use osc_ir::{LaneChangeTrajectory, LaneletId, Pose, SpeedTransition};
use thiserror::Error;

/// Speed change request (target speed with its transition shape).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpeedRequest {
    pub target: f64,
    pub transition: SpeedTransition,
    /// Longitudinal acceleration magnitude for linear transitions.
    pub acceleration: Option<f64>,
}

impl SpeedRequest {
    pub fn step(target: f64) -> Self {
        SpeedRequest {
            target,
            transition: SpeedTransition::Step,
            acceleration: None,
        }
    }

    pub fn linear(target: f64, acceleration: f64) -> Self {
        SpeedRequest {
            target,
            transition: SpeedTransition::Linear,
            acceleration: Some(acceleration),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LaneChangeRequest {
    pub target: LaneletId,
    /// Lateral offset from the target lanelet's centerline, left positive.
    pub offset: f64,
    pub trajectory: LaneChangeTrajectory,
    pub lateral_velocity: Option<f64>,
}

/// Longitudinal limits applied to an entity's motion planner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DynamicConstraints {
    pub max_acceleration: f64,
    pub max_deceleration: f64,
    pub max_speed: Option<f64>,
}

impl DynamicConstraints {
    /// Clamp a signed acceleration request into these limits.
    pub fn clamp_acceleration(&self, acceleration: f64) -> f64 {
        acceleration.clamp(-self.max_deceleration.abs(), self.max_acceleration.abs())
    }

    pub fn clamp_speed(&self, speed: f64) -> f64 {
        match self.max_speed {
            Some(max) => speed.min(max),
            None => speed,
        }
    }
}

/// One instruction for one entity's motion planner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Instruction {
    TargetSpeed(SpeedRequest),
    Teleport(Pose),
    LaneChange(LaneChangeRequest),
    DynamicConstraints(DynamicConstraints),
}

impl Instruction {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Instruction::TargetSpeed(_) => "target speed",
            Instruction::Teleport(_) => "teleport",
            Instruction::LaneChange(_) => "lane change",
            Instruction::DynamicConstraints(_) => "dynamic constraints",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("entity `{0}` does not exist")]
    UnknownEntity(String),
    #[error("{entity} rejected {instruction}: {reason}")]
    Rejected {
        entity: String,
        instruction: &'static str,
        reason: String,
    },
}

/// Write access to the simulated world.
///
/// Applying the same instruction twice within one tick has the same effect as applying it once.
pub trait ActionApplication {
    fn apply(&mut self, entity: &str, instruction: Instruction) -> Result<(), ApplyError>;
}
