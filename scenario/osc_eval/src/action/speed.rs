//! Speed action: reach an absolute or relative target speed.

use osc_ir::{SpeedActionDef, SpeedTarget, SpeedTransition};
use osc_world::{Instruction, SpeedRequest};

use super::{ActionContext, SPEED_TOLERANCE};
use crate::errors::ScenarioResult;

fn target(def: &SpeedActionDef, cx: &ActionContext<'_>) -> ScenarioResult<f64> {
    match &def.target {
        SpeedTarget::Absolute { value } => cx.scope.number(value),
        SpeedTarget::Relative {
            entity_ref,
            value_type,
            value,
            ..
        } => {
            let reference = cx.status(entity_ref)?;
            Ok(value_type.resolve(reference.speed, cx.scope.number(value)?))
        }
    }
}

/// A continuous relative target keeps tracking its reference and is never reached.
pub(super) fn reached(def: &SpeedActionDef, actor: &str, cx: &ActionContext<'_>) -> ScenarioResult<bool> {
    if matches!(def.target, SpeedTarget::Relative { continuous: true, .. }) {
        return Ok(false);
    }
    let speed = cx.status(actor)?.speed;
    Ok((speed - target(def, cx)?).abs() <= SPEED_TOLERANCE)
}

pub(super) fn instruction(def: &SpeedActionDef, cx: &ActionContext<'_>) -> ScenarioResult<Instruction> {
    let target = target(def, cx)?;
    let request = match def.dynamics.shape {
        SpeedTransition::Step => SpeedRequest::step(target),
        SpeedTransition::Linear => SpeedRequest {
            target,
            transition: SpeedTransition::Linear,
            acceleration: def
                .dynamics
                .rate
                .as_ref()
                .map(|rate| cx.scope.number(rate))
                .transpose()?,
        },
    };
    Ok(Instruction::TargetSpeed(request))
}
