//! Lane change action.

use osc_ir::{LaneChangeActionDef, LaneChangeTarget, LaneletId};
use osc_world::{Instruction, LaneChangeRequest};

use super::{ActionContext, LANE_OFFSET_TOLERANCE};
use crate::errors::{invalid_state, rejected, ScenarioResult};

#[derive(Clone, Debug)]
pub(super) struct LaneChange {
    def: LaneChangeActionDef,
    /// Resolved when the action starts.
    target: Option<LaneletId>,
}

impl LaneChange {
    pub(super) fn new(def: LaneChangeActionDef) -> Self {
        LaneChange { def, target: None }
    }

    pub(super) fn resolve_target(&mut self, cx: &ActionContext<'_>) -> ScenarioResult<()> {
        let target = match &self.def.target {
            LaneChangeTarget::Absolute { lanelet_id } => *lanelet_id,
            LaneChangeTarget::Relative { entity_ref, shift } => {
                let lanelet = cx
                    .status(entity_ref)?
                    .lanelet_pose
                    .ok_or_else(|| rejected(entity_ref, "is not on a lanelet"))?
                    .lanelet_id;
                cx.simulation
                    .adjacent_lanelet(lanelet, *shift)
                    .ok_or_else(|| {
                        rejected(
                            entity_ref,
                            format!("there is no lanelet {shift} lanes from {lanelet}"),
                        )
                    })?
            }
        };
        self.target = Some(target);
        Ok(())
    }

    pub(super) fn clear_target(&mut self) {
        self.target = None;
    }

    fn target(&self) -> ScenarioResult<LaneletId> {
        self.target
            .ok_or_else(|| invalid_state("LaneChangeAction", "run", "idle"))
    }

    pub(super) fn reached(&self, actor: &str, cx: &ActionContext<'_>) -> ScenarioResult<bool> {
        let target = self.target()?;
        Ok(cx.status(actor)?.lanelet_pose.is_some_and(|pose| {
            pose.lanelet_id == target
                && (pose.offset - self.def.target_offset).abs() <= LANE_OFFSET_TOLERANCE
        }))
    }

    pub(super) fn instruction(&self, cx: &ActionContext<'_>) -> ScenarioResult<Instruction> {
        Ok(Instruction::LaneChange(LaneChangeRequest {
            target: self.target()?,
            offset: self.def.target_offset,
            trajectory: self.def.dynamics.trajectory,
            lateral_velocity: self
                .def
                .dynamics
                .lateral_velocity
                .as_ref()
                .map(|velocity| cx.scope.number(velocity))
                .transpose()?,
        }))
    }
}
