//! Condition evaluation.
//!
//! `evaluate` is a pure function of the condition, its scope and a world
//! snapshot: the same inputs always give the same answer.

use osc_ir::{
    ByEntityCondition, ConditionDef, ConditionKind, DistanceType, EntityCondition,
    ParameterCondition, TriggeringRule,
};
use osc_world::distance::{
    bounding_box_lateral, bounding_box_longitudinal, footprint, footprint_distance,
    footprints_overlap,
};
use osc_world::{DistanceOptions, EntityStatus, WorldQuery};
use tracing::trace;

use crate::errors::{configuration, parameter_type, unknown_entity, ScenarioResult};
use crate::position;
use crate::scope::Scope;
use crate::states::ElementStates;

/// What conditions can observe at one instant.
#[derive(Copy, Clone)]
pub struct Snapshot<'a> {
    /// Simulated seconds since the run started.
    pub time: f64,
    pub world: &'a dyn WorldQuery,
    pub states: &'a ElementStates,
}

impl<'a> Snapshot<'a> {
    pub fn new(time: f64, world: &'a dyn WorldQuery, states: &'a ElementStates) -> Self {
        Snapshot {
            time,
            world,
            states,
        }
    }

    fn status(&self, name: &str) -> ScenarioResult<EntityStatus> {
        self.world.entity(name).ok_or_else(|| unknown_entity(name))
    }
}

pub fn evaluate(
    condition: &ConditionDef,
    scope: &Scope,
    snapshot: &Snapshot<'_>,
) -> ScenarioResult<bool> {
    let value = match &condition.kind {
        ConditionKind::SimulationTime(c) => c.rule.apply(snapshot.time, scope.number(&c.value)?),
        ConditionKind::Parameter(c) => parameter(c, scope)?,
        ConditionKind::StoryboardElementState(c) => {
            let state = snapshot.states.get(&c.element_ref).ok_or_else(|| {
                configuration(format!(
                    "condition `{}` refers to unknown element `{}`",
                    condition.name, c.element_ref
                ))
            })?;
            state == c.state
        }
        ConditionKind::ByEntity(c) => by_entity(c, scope, snapshot)?,
    };
    trace!(condition = %condition.name, value, "condition evaluated");
    Ok(value)
}

fn parameter(condition: &ParameterCondition, scope: &Scope) -> ScenarioResult<bool> {
    let name = &condition.parameter_ref;
    let current = scope.lookup(name)?;
    let expected = current
        .parameter_type()
        .parse(&condition.value)
        .map_err(|error| parameter_type(name, error.to_string()))?;
    if let (Some(lhs), Some(rhs)) = (current.as_f64(), expected.as_f64()) {
        return Ok(condition.rule.apply(lhs, rhs));
    }
    condition.rule.apply_eq(&current, &expected).ok_or_else(|| {
        parameter_type(
            name,
            format!(
                "rule {} does not apply to {} values",
                condition.rule,
                current.parameter_type()
            ),
        )
    })
}

fn by_entity(
    condition: &ByEntityCondition,
    scope: &Scope,
    snapshot: &Snapshot<'_>,
) -> ScenarioResult<bool> {
    let entities = &condition.triggering_entities;
    let results = entities
        .entity_refs
        .iter()
        .map(|entity| entity_condition(&condition.condition, entity, scope, snapshot));
    match entities.rule {
        TriggeringRule::Any => {
            for result in results {
                if result? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        TriggeringRule::All => {
            let mut any = false;
            for result in results {
                if !result? {
                    return Ok(false);
                }
                any = true;
            }
            Ok(any)
        }
    }
}

fn entity_condition(
    condition: &EntityCondition,
    entity: &str,
    scope: &Scope,
    snapshot: &Snapshot<'_>,
) -> ScenarioResult<bool> {
    let status = snapshot.status(entity)?;
    match condition {
        EntityCondition::RelativeDistance {
            entity_ref,
            distance_type,
            freespace,
            allow_lane_change,
            rule,
            value,
        } => {
            let other = snapshot.status(entity_ref)?;
            let distance = relative_distance(
                snapshot.world,
                (entity, &status),
                (entity_ref, &other),
                *distance_type,
                *freespace,
                *allow_lane_change,
            );
            Ok(match distance {
                Some(distance) => rule.apply(distance, scope.number(value)?),
                None => false,
            })
        }
        EntityCondition::Speed { rule, value } => Ok(rule.apply(status.speed, scope.number(value)?)),
        EntityCondition::Acceleration { rule, value } => {
            Ok(rule.apply(status.acceleration, scope.number(value)?))
        }
        EntityCondition::ReachPosition {
            position,
            tolerance,
        } => {
            let tolerance = scope.number(tolerance)?;
            Ok(match position::resolve(position, snapshot.world)? {
                Some(target) => status.pose.position.distance_2d(&target.position) <= tolerance,
                None => false,
            })
        }
        EntityCondition::StandStill { rule, duration } => {
            Ok(rule.apply(status.stand_still_duration, scope.number(duration)?))
        }
        EntityCondition::Collision { entity_ref } => {
            let other = snapshot.status(entity_ref)?;
            Ok(footprints_overlap(
                &footprint(&status.pose, &status.bounding_box),
                &footprint(&other.pose, &other.bounding_box),
            ))
        }
    }
}

/// Unsigned distance from `from` to `to`, or `None` when the world cannot relate them.
fn relative_distance(
    world: &dyn WorldQuery,
    (from, from_status): (&str, &EntityStatus),
    (to, to_status): (&str, &EntityStatus),
    distance_type: DistanceType,
    freespace: bool,
    allow_lane_change: bool,
) -> Option<f64> {
    let signed = match distance_type {
        DistanceType::Cartesian => {
            return Some(if freespace {
                footprint_distance(
                    &footprint(&from_status.pose, &from_status.bounding_box),
                    &footprint(&to_status.pose, &to_status.bounding_box),
                )
            } else {
                from_status.pose.position.distance_2d(&to_status.pose.position)
            });
        }
        DistanceType::Longitudinal => {
            let options = DistanceOptions {
                allow_lane_change,
                ..DistanceOptions::default()
            };
            let distance = world.longitudinal_distance(from, to, options)?;
            if freespace {
                bounding_box_longitudinal(
                    distance,
                    &from_status.bounding_box,
                    &to_status.bounding_box,
                )
            } else {
                distance
            }
        }
        DistanceType::Lateral => {
            let distance = world.lateral_distance(from, to, allow_lane_change)?;
            if freespace {
                bounding_box_lateral(distance, &from_status.bounding_box, &to_status.bounding_box)
            } else {
                distance
            }
        }
    };
    Some(signed.abs())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
