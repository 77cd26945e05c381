//! Private actions and their lifecycle.
//!
//! An action moves `Idle -> Running -> Accomplished`. Every kind is treated as an
//! ordered list of entries (one entry for everything except speed profiles), and
//! each actor has its own cursor into that list. On every `run` an actor whose
//! current entry is satisfied moves to the next one, then the instruction for its
//! current entry is sent to the world again.

mod accomplishments;
mod lane_change;
mod speed;
mod speed_profile;

pub use accomplishments::{Accomplishments, Cursor};

use osc_ir::{
    ActionDef, ActionKindDef, SpeedActionDef, SpeedProfileActionDef, TeleportActionDef,
};
use osc_world::{EntityStatus, Instruction, Simulation};
use tracing::{debug, trace};

use crate::errors::{invalid_state, rejected, unknown_entity, ScenarioResult};
use crate::position;
use crate::scope::Scope;

use lane_change::LaneChange;

/// Speed difference under which a speed target counts as reached (m/s).
pub const SPEED_TOLERANCE: f64 = 0.01;

/// Lateral offset difference under which a lane change counts as done (m).
pub const LANE_OFFSET_TOLERANCE: f64 = 0.1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    Running,
    Accomplished,
}

impl ActionState {
    pub fn name(self) -> &'static str {
        match self {
            ActionState::Idle => "idle",
            ActionState::Running => "running",
            ActionState::Accomplished => "accomplished",
        }
    }
}

/// What an action sees while starting or running.
pub struct ActionContext<'a> {
    pub time: f64,
    pub scope: &'a Scope,
    pub simulation: &'a mut dyn Simulation,
}

impl ActionContext<'_> {
    fn status(&self, entity: &str) -> ScenarioResult<EntityStatus> {
        self.simulation
            .entity(entity)
            .ok_or_else(|| unknown_entity(entity))
    }
}

#[derive(Clone, Debug)]
enum ActionKind {
    Speed(SpeedActionDef),
    Teleport(TeleportActionDef),
    LaneChange(LaneChange),
    SpeedProfile(SpeedProfileActionDef),
}

impl ActionKind {
    fn entry_count(&self) -> usize {
        match self {
            ActionKind::SpeedProfile(def) => def.entries.len(),
            ActionKind::Speed(_) | ActionKind::Teleport(_) | ActionKind::LaneChange(_) => 1,
        }
    }

    fn reached(&self, cursor: Cursor, actor: &str, cx: &ActionContext<'_>) -> ScenarioResult<bool> {
        match self {
            ActionKind::Speed(def) => speed::reached(def, actor, cx),
            ActionKind::LaneChange(change) => change.reached(actor, cx),
            ActionKind::SpeedProfile(def) => speed_profile::reached(def, cursor, actor, cx),
            ActionKind::Teleport(_) => Ok(false),
        }
    }

    fn instruction(
        &self,
        cursor: Cursor,
        actor: &str,
        cx: &ActionContext<'_>,
    ) -> ScenarioResult<Instruction> {
        match self {
            ActionKind::Speed(def) => speed::instruction(def, cx),
            ActionKind::LaneChange(change) => change.instruction(cx),
            ActionKind::SpeedProfile(def) => speed_profile::instruction(def, cursor, actor, cx),
            ActionKind::Teleport(def) => {
                let pose = position::resolve(&def.position, cx.simulation.as_query())?
                    .ok_or_else(|| rejected(actor, "teleport target is off the road map"))?;
                Ok(Instruction::Teleport(pose))
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Action {
    name: String,
    kind_name: &'static str,
    state: ActionState,
    kind: ActionKind,
    /// Actors captured at `start`, in declaration order.
    actors: Vec<String>,
    accomplishments: Accomplishments,
}

impl Action {
    pub fn new(def: ActionDef) -> Self {
        let kind_name = def.kind.kind_name();
        let kind = match def.kind {
            ActionKindDef::Speed(def) => ActionKind::Speed(def),
            ActionKindDef::Teleport(def) => ActionKind::Teleport(def),
            ActionKindDef::LaneChange(def) => ActionKind::LaneChange(LaneChange::new(def)),
            ActionKindDef::SpeedProfile(def) => ActionKind::SpeedProfile(def),
        };
        Action {
            name: def.name,
            kind_name,
            state: ActionState::Idle,
            kind,
            actors: Vec::new(),
            accomplishments: Accomplishments::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind_name
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn actors(&self) -> &[String] {
        &self.actors
    }

    /// Number of entries each actor has to get through.
    pub fn entry_count(&self) -> usize {
        self.kind.entry_count()
    }

    /// Entries `actor` has completed, or `None` if the action never started for it.
    pub fn progress(&self, actor: &str) -> Option<usize> {
        self.accomplishments.get(actor).map(|cursor| cursor.index)
    }

    #[inline]
    pub fn accomplished(&self) -> bool {
        self.state == ActionState::Accomplished
    }

    /// Whether the action takes effect in a single step.
    pub fn ends_immediately(&self) -> bool {
        matches!(self.kind, ActionKind::Teleport(_))
    }

    /// Capture the actors in scope and put every cursor on the first entry.
    pub fn start(&mut self, cx: &mut ActionContext<'_>) -> ScenarioResult<()> {
        if self.state != ActionState::Idle {
            return Err(invalid_state(&self.name, "start", self.state.name()));
        }
        self.actors = cx.scope.actors();
        self.accomplishments.clear();
        for actor in &self.actors {
            self.accomplishments.begin(actor, cx.time);
        }
        match &mut self.kind {
            ActionKind::LaneChange(change) => change.resolve_target(cx)?,
            ActionKind::SpeedProfile(def) => speed_profile::apply_constraints(def, &self.actors, cx)?,
            ActionKind::Speed(_) | ActionKind::Teleport(_) => {}
        }
        self.state = ActionState::Running;
        debug!(
            action = %self.name,
            kind = self.kind_name,
            actors = ?self.actors,
            "action started"
        );
        Ok(())
    }

    pub fn run(&mut self, cx: &mut ActionContext<'_>) -> ScenarioResult<()> {
        match self.state {
            ActionState::Idle => return Err(invalid_state(&self.name, "run", "idle")),
            ActionState::Accomplished => return Ok(()),
            ActionState::Running => {}
        }
        let count = self.kind.entry_count();
        let instant = self.ends_immediately();
        for actor in &self.actors {
            let Some(mut cursor) = self.accomplishments.get(actor) else {
                continue;
            };
            if cursor.index >= count {
                continue;
            }
            if instant {
                let instruction = self.kind.instruction(cursor, actor, cx)?;
                cx.simulation.apply(actor, instruction)?;
                self.accomplishments.advance(actor, cx.time);
                continue;
            }
            if self.kind.reached(cursor, actor, cx)? {
                let Some(next) = self.accomplishments.advance(actor, cx.time) else {
                    continue;
                };
                trace!(action = %self.name, actor = %actor, entry = next.index, "entry reached");
                cursor = next;
            }
            if cursor.index < count {
                let instruction = self.kind.instruction(cursor, actor, cx)?;
                trace!(action = %self.name, actor = %actor, ?instruction, "apply");
                cx.simulation.apply(actor, instruction)?;
            }
        }
        if self
            .actors
            .iter()
            .all(|actor| self.accomplishments.is_past(actor, count))
        {
            debug!(action = %self.name, time = cx.time, "action accomplished");
            self.state = ActionState::Accomplished;
        }
        Ok(())
    }

    /// Back to `Idle` with no cursors, ready for another execution.
    pub fn reset(&mut self) {
        self.state = ActionState::Idle;
        self.actors.clear();
        self.accomplishments.clear();
        if let ActionKind::LaneChange(change) = &mut self.kind {
            change.clear_target();
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
