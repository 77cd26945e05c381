//! Resolving document positions against the world.

use osc_ir::{Pose, Position};
use osc_world::WorldQuery;

use crate::errors::{unknown_entity, ScenarioResult};

/// World pose of `position`, or `None` if it lies off the road map.
///
/// A relative position whose reference entity is missing is an error.
pub fn resolve(position: &Position, world: &dyn WorldQuery) -> ScenarioResult<Option<Pose>> {
    match position {
        Position::World(pose) => Ok(Some(*pose)),
        Position::Lanelet(lanelet_pose) => Ok(world.to_world(lanelet_pose)),
        Position::RelativeObject { entity_ref, dx, dy } => {
            let reference = world
                .entity(entity_ref)
                .ok_or_else(|| unknown_entity(entity_ref))?;
            let mut pose = reference.pose;
            pose.position.x += dx;
            pose.position.y += dy;
            Ok(Some(pose))
        }
    }
}
