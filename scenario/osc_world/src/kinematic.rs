//! Point-mass world on a straight road.
//!
//! `KinematicWorld` is the reference `Simulation`: each entity integrates its speed
//! command and lane change at every `advance`, with no interaction between entities.
//! It records every applied instruction so callers can inspect what the interpreter
//! asked for.

use osc_ir::{BoundingBox, LaneChangeTrajectory, LaneletId, LaneletPose, Pose, SpeedTransition};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::apply::{
    ActionApplication, ApplyError, DynamicConstraints, Instruction, LaneChangeRequest,
    SpeedRequest,
};
use crate::distance::{footprint, pick_longitudinal};
use crate::query::{DistanceOptions, EntityStatus, LaneBoundDistances, WorldQuery};
use crate::road::StraightRoad;
use crate::simulation::Simulation;

/// Acceleration used by linear speed changes that carry no rate (m/s²).
pub const DEFAULT_ACCELERATION: f64 = 3.0;

/// Lateral speed used by lane changes that carry no velocity (m/s).
pub const DEFAULT_LATERAL_VELOCITY: f64 = 1.0;

/// Below this speed an entity counts as standing still (m/s).
pub const STAND_STILL_SPEED: f64 = 1e-3;

/// An instruction as it reached the world.
#[derive(Clone, Debug, PartialEq)]
pub struct AppliedInstruction {
    pub time: f64,
    pub entity: String,
    pub instruction: Instruction,
}

#[derive(Clone, Debug)]
struct Body {
    pose: Pose,
    speed: f64,
    acceleration: f64,
    bounding_box: BoundingBox,
    speed_command: Option<SpeedRequest>,
    lane_change: Option<LaneChangeRequest>,
    constraints: Option<DynamicConstraints>,
    stand_still: f64,
}

impl Body {
    fn step_speed(&mut self, dt: f64) {
        let previous = self.speed;
        if let Some(command) = self.speed_command {
            match command.transition {
                SpeedTransition::Step => self.speed = command.target,
                SpeedTransition::Linear => {
                    let gap = command.target - self.speed;
                    if gap != 0.0 {
                        let rate = command.acceleration.unwrap_or(DEFAULT_ACCELERATION).abs();
                        let mut acceleration = rate.copysign(gap);
                        if let Some(constraints) = &self.constraints {
                            acceleration = constraints.clamp_acceleration(acceleration);
                        }
                        let delta = acceleration * dt;
                        if delta.abs() >= gap.abs() {
                            self.speed = command.target;
                        } else {
                            self.speed += delta;
                        }
                    }
                }
            }
        }
        if let Some(constraints) = &self.constraints {
            self.speed = constraints.clamp_speed(self.speed);
        }
        self.acceleration = (self.speed - previous) / dt;
    }

    fn step_lateral(&mut self, road: &StraightRoad, dt: f64) {
        let Some(change) = self.lane_change else {
            return;
        };
        let Some(center) = road.center_y(change.target) else {
            self.lane_change = None;
            return;
        };
        let target_y = center + change.offset;
        let gap = target_y - self.pose.position.y;
        let reach = match change.trajectory {
            LaneChangeTrajectory::Step => f64::INFINITY,
            LaneChangeTrajectory::Cubic | LaneChangeTrajectory::Linear => {
                change
                    .lateral_velocity
                    .unwrap_or(DEFAULT_LATERAL_VELOCITY)
                    .abs()
                    * dt
            }
        };
        if gap.abs() <= reach {
            self.pose.position.y = target_y;
            self.lane_change = None;
        } else {
            self.pose.position.y += reach.copysign(gap);
        }
    }

    fn integrate(&mut self, dt: f64) {
        let (sin, cos) = self.pose.yaw.sin_cos();
        self.pose.position.x += self.speed * cos * dt;
        self.pose.position.y += self.speed * sin * dt;
        if self.speed.abs() < STAND_STILL_SPEED {
            self.stand_still += dt;
        } else {
            self.stand_still = 0.0;
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct KinematicWorld {
    road: StraightRoad,
    bodies: FxHashMap<String, Body>,
    time: f64,
    log: Vec<AppliedInstruction>,
}

impl KinematicWorld {
    pub fn new(road: StraightRoad) -> Self {
        KinematicWorld {
            road,
            ..KinematicWorld::default()
        }
    }

    pub fn road(&self) -> &StraightRoad {
        &self.road
    }

    /// Simulated seconds integrated so far.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Add an entity, replacing any entity of the same name.
    pub fn spawn(&mut self, name: impl Into<String>, bounding_box: BoundingBox, pose: Pose, speed: f64) {
        self.bodies.insert(
            name.into(),
            Body {
                pose,
                speed,
                acceleration: 0.0,
                bounding_box,
                speed_command: None,
                lane_change: None,
                constraints: None,
                stand_still: 0.0,
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bodies.contains_key(name)
    }

    fn body_mut(&mut self, name: &str) -> Result<&mut Body, ApplyError> {
        self.bodies
            .get_mut(name)
            .ok_or_else(|| ApplyError::UnknownEntity(name.to_string()))
    }

    /// Move an entity without going through an instruction.
    pub fn place(&mut self, name: &str, pose: Pose) -> Result<(), ApplyError> {
        self.body_mut(name)?.pose = pose;
        Ok(())
    }

    /// Override an entity's speed without going through an instruction.
    pub fn set_speed(&mut self, name: &str, speed: f64) -> Result<(), ApplyError> {
        let body = self.body_mut(name)?;
        body.speed = speed;
        body.speed_command = None;
        Ok(())
    }

    /// Instructions applied since the last `clear_log`, in application order.
    pub fn applied(&self) -> &[AppliedInstruction] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    fn lanelet_pose(&self, body: &Body) -> Option<LaneletPose> {
        self.road.to_lanelet_pose(&body.pose)
    }

    fn lanelet_pair(&self, from: &str, to: &str) -> Option<(LaneletPose, LaneletPose)> {
        let from = self.lanelet_pose(self.bodies.get(from)?)?;
        let to = self.lanelet_pose(self.bodies.get(to)?)?;
        Some((from, to))
    }
}

impl WorldQuery for KinematicWorld {
    fn entity(&self, name: &str) -> Option<EntityStatus> {
        let body = self.bodies.get(name)?;
        Some(EntityStatus {
            pose: body.pose,
            speed: body.speed,
            acceleration: body.acceleration,
            bounding_box: body.bounding_box,
            lanelet_pose: self.lanelet_pose(body),
            stand_still_duration: body.stand_still,
        })
    }

    fn longitudinal_distance(
        &self,
        from: &str,
        to: &str,
        options: DistanceOptions,
    ) -> Option<f64> {
        let (from, to) = self.lanelet_pair(from, to)?;
        let lane_change_allowed = options.allow_lane_change || options.include_adjacent_lanelet;
        if from.lanelet_id != to.lanelet_id && !lane_change_allowed {
            return None;
        }
        let forward = Some(to.s - from.s).filter(|d| *d >= 0.0);
        let backward = Some(from.s - to.s).filter(|d| *d >= 0.0);
        pick_longitudinal(forward, backward)
    }

    fn lateral_distance(&self, from: &str, to: &str, allow_lane_change: bool) -> Option<f64> {
        let (from_pose, to_pose) = self.lanelet_pair(from, to)?;
        if from_pose.lanelet_id != to_pose.lanelet_id && !allow_lane_change {
            return None;
        }
        let from_y = self.bodies.get(from)?.pose.position.y;
        let to_y = self.bodies.get(to)?.pose.position.y;
        Some(to_y - from_y)
    }

    fn speed_limit(&self, lanelet: LaneletId) -> Option<f64> {
        self.road
            .contains(lanelet)
            .then_some(self.road.speed_limit)
    }

    fn lane_bound_distances(&self, name: &str) -> Option<LaneBoundDistances> {
        let body = self.bodies.get(name)?;
        let lanelet = self.lanelet_pose(body)?.lanelet_id;
        let (left_bound, right_bound) = self.road.bounds(lanelet)?;
        let corners = footprint(&body.pose, &body.bounding_box);
        let top = corners.iter().map(|c| c.y).fold(f64::NEG_INFINITY, f64::max);
        let bottom = corners.iter().map(|c| c.y).fold(f64::INFINITY, f64::min);
        Some(LaneBoundDistances {
            left: left_bound - top,
            right: bottom - right_bound,
        })
    }

    fn adjacent_lanelet(&self, lanelet: LaneletId, shift: i32) -> Option<LaneletId> {
        self.road.adjacent(lanelet, shift)
    }

    fn to_world(&self, pose: &LaneletPose) -> Option<Pose> {
        self.road.to_world(pose)
    }
}

impl ActionApplication for KinematicWorld {
    fn apply(&mut self, entity: &str, instruction: Instruction) -> Result<(), ApplyError> {
        let road = self.road;
        let body = self.body_mut(entity)?;
        match instruction {
            Instruction::TargetSpeed(request) => {
                if request.transition == SpeedTransition::Step {
                    body.speed = request.target;
                }
                body.speed_command = Some(request);
            }
            Instruction::Teleport(pose) => {
                body.pose = pose;
                body.lane_change = None;
            }
            Instruction::LaneChange(request) => {
                let Some(center) = road.center_y(request.target) else {
                    return Err(ApplyError::Rejected {
                        entity: entity.to_string(),
                        instruction: instruction.kind_name(),
                        reason: format!("lanelet {} is not on the road", request.target),
                    });
                };
                if request.trajectory == LaneChangeTrajectory::Step {
                    body.pose.position.y = center + request.offset;
                    body.lane_change = None;
                } else {
                    body.lane_change = Some(request);
                }
            }
            Instruction::DynamicConstraints(constraints) => {
                body.constraints = Some(constraints);
            }
        }
        trace!(entity, kind = instruction.kind_name(), "instruction applied");
        self.log.push(AppliedInstruction {
            time: self.time,
            entity: entity.to_string(),
            instruction,
        });
        Ok(())
    }
}

impl Simulation for KinematicWorld {
    fn advance(&mut self, dt: f64) {
        let road = self.road;
        for body in self.bodies.values_mut() {
            body.step_speed(dt);
            body.step_lateral(&road, dt);
            body.integrate(dt);
        }
        self.time += dt;
    }

    fn as_query(&self) -> &dyn WorldQuery {
        self
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
