//! World Snapshot Query boundary.

use osc_ir::{BoundingBox, LaneletId, LaneletPose, Pose};

/// Current state of one entity as seen by the interpreter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EntityStatus {
    pub pose: Pose,
    /// Signed longitudinal speed (m/s).
    pub speed: f64,
    /// Longitudinal acceleration over the last world step (m/s²).
    pub acceleration: f64,
    pub bounding_box: BoundingBox,
    /// `None` when the entity is off the road map.
    pub lanelet_pose: Option<LaneletPose>,
    /// Seconds the entity has been continuously at rest.
    pub stand_still_duration: f64,
}

/// Options for longitudinal distance queries.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DistanceOptions {
    pub allow_lane_change: bool,
    pub include_adjacent_lanelet: bool,
    pub include_opposite_direction: bool,
}

/// Distances from an entity's footprint to the bounds of its lanelet.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LaneBoundDistances {
    pub left: f64,
    pub right: f64,
}

impl LaneBoundDistances {
    /// Distance to the nearer bound.
    pub fn nearest(&self) -> f64 {
        self.left.min(self.right)
    }
}

/// Read access to the simulated world.
///
/// Queries are synchronous and cheap; the interpreter calls them many times per tick.
/// Distances follow one sign convention: positive means `to` is ahead of / left of `from`.
pub trait WorldQuery {
    /// Status of `name`, or `None` if no such entity exists.
    fn entity(&self, name: &str) -> Option<EntityStatus>;

    /// Signed distance along the lane from `from` to `to`.
    fn longitudinal_distance(&self, from: &str, to: &str, options: DistanceOptions)
        -> Option<f64>;

    /// Signed lateral distance between the lanelet poses of `from` and `to`.
    fn lateral_distance(&self, from: &str, to: &str, allow_lane_change: bool) -> Option<f64>;

    /// Speed limit of a lanelet (m/s).
    fn speed_limit(&self, lanelet: LaneletId) -> Option<f64>;

    fn lane_bound_distances(&self, name: &str) -> Option<LaneBoundDistances>;

    /// The lanelet `shift` lanes to the left (negative: right) of `lanelet`.
    fn adjacent_lanelet(&self, lanelet: LaneletId, shift: i32) -> Option<LaneletId>;

    /// Convert a lanelet pose to a world pose.
    fn to_world(&self, pose: &LaneletPose) -> Option<Pose>;
}
