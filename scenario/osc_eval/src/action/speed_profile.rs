//! Speed profile action: a sequence of target speeds reached one after another.

use osc_ir::{FollowingMode, SpeedProfileActionDef};
use osc_world::{DynamicConstraints, Instruction, SpeedRequest, DEFAULT_ACCELERATION};

use super::{ActionContext, Cursor, SPEED_TOLERANCE};
use crate::errors::{configuration, ScenarioResult};
use crate::scope::Scope;

fn constraints(
    def: &SpeedProfileActionDef,
    scope: &Scope,
) -> ScenarioResult<Option<DynamicConstraints>> {
    def.dynamic_constraints
        .as_ref()
        .map(|constraints| {
            Ok(DynamicConstraints {
                max_acceleration: scope.number(&constraints.max_acceleration)?,
                max_deceleration: scope.number(&constraints.max_deceleration)?,
                max_speed: constraints
                    .max_speed
                    .as_ref()
                    .map(|speed| scope.number(speed))
                    .transpose()?,
            })
        })
        .transpose()
}

/// Send the declared dynamic constraints, if any, to every actor.
pub(super) fn apply_constraints(
    def: &SpeedProfileActionDef,
    actors: &[String],
    cx: &mut ActionContext<'_>,
) -> ScenarioResult<()> {
    if let Some(constraints) = constraints(def, cx.scope)? {
        for actor in actors {
            cx.simulation
                .apply(actor, Instruction::DynamicConstraints(constraints))?;
        }
    }
    Ok(())
}

/// Absolute target speed of entry `index`; relative to `entity_ref` when one is given.
fn entry_target(
    def: &SpeedProfileActionDef,
    index: usize,
    cx: &ActionContext<'_>,
) -> ScenarioResult<f64> {
    let entry = def
        .entries
        .get(index)
        .ok_or_else(|| configuration(format!("speed profile has no entry {index}")))?;
    let speed = cx.scope.number(&entry.speed)?;
    match &def.entity_ref {
        Some(reference) => Ok(cx.status(reference)?.speed + speed),
        None => Ok(speed),
    }
}

/// Entry time of the current entry, which only counts in `position` mode.
fn deadline(
    def: &SpeedProfileActionDef,
    index: usize,
    scope: &Scope,
) -> ScenarioResult<Option<f64>> {
    match (def.following_mode, def.entries.get(index)) {
        (FollowingMode::Position, Some(entry)) => {
            entry.time.as_ref().map(|time| scope.number(time)).transpose()
        }
        _ => Ok(None),
    }
}

/// An entry is done once its speed is reached, or in `position` mode once its
/// time has elapsed.
pub(super) fn reached(
    def: &SpeedProfileActionDef,
    cursor: Cursor,
    actor: &str,
    cx: &ActionContext<'_>,
) -> ScenarioResult<bool> {
    if let Some(time) = deadline(def, cursor.index, cx.scope)? {
        if cx.time - cursor.entered_at >= time {
            return Ok(true);
        }
    }
    let target = entry_target(def, cursor.index, cx)?;
    Ok((cx.status(actor)?.speed - target).abs() <= SPEED_TOLERANCE)
}

/// Linear speed request for the actor's current entry.
///
/// In `position` mode an entry with a time gets the acceleration that lands on
/// the target speed when the time runs out. Everything else accelerates at the
/// declared limit. Declared constraints always cap the result.
pub(super) fn instruction(
    def: &SpeedProfileActionDef,
    cursor: Cursor,
    actor: &str,
    cx: &ActionContext<'_>,
) -> ScenarioResult<Instruction> {
    let target = entry_target(def, cursor.index, cx)?;
    let speed = cx.status(actor)?.speed;
    let constraints = constraints(def, cx.scope)?;
    let limit = match constraints {
        Some(c) if target < speed => c.max_deceleration.abs(),
        Some(c) => c.max_acceleration.abs(),
        None => DEFAULT_ACCELERATION,
    };
    let mut rate = match deadline(def, cursor.index, cx.scope)? {
        Some(time) => {
            let remaining = time - (cx.time - cursor.entered_at);
            if remaining > 0.0 {
                (target - speed).abs() / remaining
            } else {
                limit
            }
        }
        None => limit,
    };
    if constraints.is_some() {
        rate = rate.min(limit);
    }
    Ok(Instruction::TargetSpeed(SpeedRequest::linear(target, rate)))
}
