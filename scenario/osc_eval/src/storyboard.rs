//! The storyboard tree and how it advances.
//!
//! Every element is a [`Node`] with a start trigger, an optional stop trigger
//! and either child nodes or, for events, a list of actions. A tick walks the
//! tree once:
//!
//! - a standby child whose start trigger activates starts, and its own standby
//!   children are polled in the same tick
//! - a running element whose stop trigger rises stops, together with everything
//!   running beneath it
//! - a running element whose children were all finished before this tick ends
//!
//! Transition states are settled at the start of the following tick, so a
//! parent notices a child's end one tick after the child ended.

mod build;
mod validate;

pub use build::build;

use osc_ir::{ElementState, Priority};
use osc_world::Simulation;
use tracing::{debug, trace};

use crate::action::{Action, ActionContext, ActionState};
use crate::condition::Snapshot;
use crate::errors::ScenarioResult;
use crate::interpreter::Verdict;
use crate::scope::{LocalScope, Scope};
use crate::states::ElementStates;
use crate::trigger::Trigger;

/// Name under which the storyboard root is registered.
pub const STORYBOARD: &str = "Storyboard";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Storyboard,
    Story,
    Act,
    ManeuverGroup,
    Maneuver,
    Event,
}

impl ElementKind {
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Storyboard => "Storyboard",
            ElementKind::Story => "Story",
            ElementKind::Act => "Act",
            ElementKind::ManeuverGroup => "ManeuverGroup",
            ElementKind::Maneuver => "Maneuver",
            ElementKind::Event => "Event",
        }
    }
}

/// Everything one tick of the storyboard works against.
pub struct TickContext<'a> {
    pub time: f64,
    pub simulation: &'a mut dyn Simulation,
    pub states: &'a mut ElementStates,
}

impl TickContext<'_> {
    fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::new(self.time, self.simulation.as_query(), &*self.states)
    }

    fn action_context<'s>(&'s mut self, scope: &'s Scope) -> ActionContext<'s> {
        ActionContext {
            time: self.time,
            scope,
            simulation: &mut *self.simulation,
        }
    }

    fn record(&mut self, name: &str, kind: &'static str, from: ElementState, to: ElementState) {
        debug!(element = name, kind, %from, %to, time = self.time, "transition");
        self.states.set(name, to);
    }
}

#[derive(Debug)]
pub struct ActionNode {
    action: Action,
    state: ElementState,
}

impl ActionNode {
    fn new(action: Action) -> Self {
        ActionNode {
            action,
            state: ElementState::StandbyState,
        }
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn state(&self) -> ElementState {
        self.state
    }

    fn set_state(&mut self, to: ElementState, ctx: &mut TickContext<'_>) {
        if self.state != to {
            ctx.record(self.action.name(), "Action", self.state, to);
            self.state = to;
        }
    }
}

#[derive(Debug)]
pub struct EventBody {
    priority: Priority,
    maximum_execution_count: u32,
    /// Times the event has started.
    executions: u32,
    actions: Vec<ActionNode>,
}

impl EventBody {
    fn start_actions(&mut self, scope: &Scope, ctx: &mut TickContext<'_>) -> ScenarioResult<()> {
        for node in &mut self.actions {
            node.action.start(&mut ctx.action_context(scope))?;
            node.set_state(ElementState::StartTransition, ctx);
        }
        self.run_actions(scope, ctx)
    }

    fn run_actions(&mut self, scope: &Scope, ctx: &mut TickContext<'_>) -> ScenarioResult<()> {
        for node in &mut self.actions {
            if node.action.state() != ActionState::Running {
                continue;
            }
            node.action.run(&mut ctx.action_context(scope))?;
            if node.action.accomplished() {
                node.set_state(ElementState::EndTransition, ctx);
            }
        }
        Ok(())
    }

    fn all_accomplished(&self) -> bool {
        self.actions.iter().all(|node| node.action.accomplished())
    }
}

#[derive(Debug)]
pub enum Body {
    Children(Vec<Node>),
    Event(EventBody),
}

#[derive(Debug)]
pub struct Node {
    name: String,
    kind: ElementKind,
    scope: LocalScope<Scope>,
    start_trigger: Trigger,
    /// Only acts (and the root) carry one; empty triggers are dropped at load.
    stop_trigger: Option<Trigger>,
    optional: bool,
    state: ElementState,
    body: Body,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn state(&self) -> ElementState {
        self.state
    }

    pub fn optional(&self) -> bool {
        self.optional
    }

    pub fn scope(&self) -> &LocalScope<Scope> {
        &self.scope
    }

    pub fn children(&self) -> &[Node] {
        match &self.body {
            Body::Children(children) => children,
            Body::Event(_) => &[],
        }
    }

    pub fn actions(&self) -> &[ActionNode] {
        match &self.body {
            Body::Children(_) => &[],
            Body::Event(event) => &event.actions,
        }
    }

    /// Times this event has started; always zero for other kinds.
    pub fn executions(&self) -> u32 {
        match &self.body {
            Body::Children(_) => 0,
            Body::Event(event) => event.executions,
        }
    }

    /// Depth-first search for the element called `name`, this node included.
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(name))
    }

    fn set_state(&mut self, to: ElementState, ctx: &mut TickContext<'_>) {
        if self.state != to {
            ctx.record(&self.name, self.kind.name(), self.state, to);
            self.state = to;
        }
    }

    /// An event that ended but has executions left goes back to standby.
    fn will_rerun(&self) -> bool {
        matches!(&self.body, Body::Event(event) if event.executions < event.maximum_execution_count)
    }

    /// Whether the parent may count this child as finished.
    fn is_finished(&self) -> bool {
        match self.state {
            ElementState::StandbyState => self.optional,
            ElementState::EndTransition => !self.will_rerun(),
            state => state.is_done(),
        }
    }

    fn priority(&self) -> Option<Priority> {
        match &self.body {
            Body::Children(_) => None,
            Body::Event(event) => Some(event.priority),
        }
    }

    fn poll_start(&mut self, ctx: &TickContext<'_>) -> ScenarioResult<bool> {
        let scope = self.scope.borrow();
        self.start_trigger.activated(&scope, &ctx.snapshot())
    }

    fn start(&mut self, ctx: &mut TickContext<'_>) -> ScenarioResult<()> {
        self.set_state(ElementState::StartTransition, ctx);
        let ends_now = match &mut self.body {
            Body::Children(children) => {
                step_children(children, ctx)?;
                false
            }
            Body::Event(event) => {
                event.executions += 1;
                let scope = self.scope.borrow();
                event.start_actions(&scope, ctx)?;
                event
                    .actions
                    .iter()
                    .all(|node| node.action.ends_immediately() && node.action.accomplished())
            }
        };
        if ends_now {
            self.end(ctx);
        }
        Ok(())
    }

    fn run(&mut self, ctx: &mut TickContext<'_>) -> ScenarioResult<()> {
        let stopped = match &mut self.stop_trigger {
            Some(trigger) => {
                let scope = self.scope.borrow();
                trigger.rising(&scope, &ctx.snapshot())?
            }
            None => false,
        };
        if stopped {
            self.stop(ctx);
            return Ok(());
        }

        let finished = match &self.body {
            Body::Children(children) => children.iter().all(Node::is_finished),
            Body::Event(event) => event.all_accomplished(),
        };
        if finished {
            self.end(ctx);
            return Ok(());
        }

        match &mut self.body {
            Body::Children(children) => step_children(children, ctx),
            Body::Event(event) => {
                let scope = self.scope.borrow();
                event.run_actions(&scope, ctx)
            }
        }
    }

    /// Natural completion. Children that never started are skipped.
    fn end(&mut self, ctx: &mut TickContext<'_>) {
        self.set_state(ElementState::EndTransition, ctx);
        if let Body::Children(children) = &mut self.body {
            for child in children {
                child.skip(ctx);
            }
        }
    }

    /// Forced termination of a running element and everything running under it.
    fn stop(&mut self, ctx: &mut TickContext<'_>) {
        if !self.state.is_running() {
            return;
        }
        self.set_state(ElementState::StopTransition, ctx);
        match &mut self.body {
            Body::Children(children) => {
                for child in children {
                    if child.state.is_running() {
                        child.stop(ctx);
                    } else {
                        child.skip(ctx);
                        child.exhaust();
                    }
                }
            }
            Body::Event(event) => {
                for node in &mut event.actions {
                    if node.state.is_running() {
                        node.set_state(ElementState::StopTransition, ctx);
                    }
                }
            }
        }
    }

    /// A standby element that will never run.
    fn skip(&mut self, ctx: &mut TickContext<'_>) {
        if self.state != ElementState::StandbyState {
            return;
        }
        self.set_state(ElementState::SkipTransition, ctx);
        match &mut self.body {
            Body::Children(children) => {
                for child in children {
                    child.skip(ctx);
                }
            }
            Body::Event(event) => {
                for node in &mut event.actions {
                    if node.state == ElementState::StandbyState {
                        node.set_state(ElementState::SkipTransition, ctx);
                    }
                }
            }
        }
    }

    /// An event that just ended under a stopping parent must not come back.
    fn exhaust(&mut self) {
        if let Body::Event(event) = &mut self.body {
            event.maximum_execution_count = event.executions;
        }
    }

    /// Move last tick's transition states to where they lead.
    fn settle(&mut self, states: &mut ElementStates) {
        let rerun = self.state == ElementState::EndTransition && self.will_rerun();
        let settled = if rerun {
            ElementState::StandbyState
        } else {
            self.state.settled()
        };
        if settled != self.state {
            trace!(element = %self.name, from = %self.state, to = %settled, "settled");
            states.set(&self.name, settled);
            self.state = settled;
        }
        match &mut self.body {
            Body::Children(children) => {
                for child in children {
                    child.settle(states);
                }
            }
            Body::Event(event) => {
                if rerun {
                    // A held-true trigger must produce a fresh rising edge.
                    self.start_trigger.reset();
                }
                for node in &mut event.actions {
                    let next = if rerun {
                        node.action.reset();
                        ElementState::StandbyState
                    } else {
                        node.state.settled()
                    };
                    if next != node.state {
                        states.set(node.action.name(), next);
                        node.state = next;
                    }
                }
            }
        }
    }
}

/// One pass over sibling elements: start what triggers, run what runs.
fn step_children(children: &mut [Node], ctx: &mut TickContext<'_>) -> ScenarioResult<()> {
    for index in 0..children.len() {
        match children[index].state {
            ElementState::StandbyState => {
                if !children[index].poll_start(ctx)? {
                    continue;
                }
                match children[index].priority() {
                    Some(Priority::Skip)
                        if children
                            .iter()
                            .enumerate()
                            .any(|(other, sibling)| other != index && sibling.state.is_running()) =>
                    {
                        debug!(element = %children[index].name, "start skipped while a sibling runs");
                        continue;
                    }
                    Some(Priority::Overwrite) => {
                        for (other, sibling) in children.iter_mut().enumerate() {
                            if other != index && sibling.state.is_running() {
                                sibling.stop(ctx);
                            }
                        }
                    }
                    _ => {}
                }
                children[index].start(ctx)?;
            }
            ElementState::RunningState => children[index].run(ctx)?,
            _ => {}
        }
    }
    Ok(())
}

/// An action applied to a single entity before the stories start.
#[derive(Debug)]
pub struct InitAction {
    entity: String,
    scope: LocalScope<Scope>,
    action: Action,
}

impl InitAction {
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn action(&self) -> &Action {
        &self.action
    }
}

#[derive(Debug)]
pub struct Criterion {
    name: String,
    trigger: Trigger,
}

impl Criterion {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A loaded, validated storyboard and its run-time state.
#[derive(Debug)]
pub struct Storyboard {
    root: Node,
    init: Vec<InitAction>,
    failure_criteria: Vec<Criterion>,
}

impl Storyboard {
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn init_actions(&self) -> &[InitAction] {
        &self.init
    }

    pub fn failure_criteria(&self) -> &[Criterion] {
        &self.failure_criteria
    }

    pub fn find(&self, name: &str) -> Option<&Node> {
        self.root.find(name)
    }

    pub fn settle(&mut self, states: &mut ElementStates) {
        self.root.settle(states);
    }

    /// Advance the storyboard by one tick and judge the run.
    ///
    /// Init actions go first, then the element tree, then failure criteria.
    /// A failure criterion that fires in the same tick the storyboard ends
    /// still fails the run.
    pub fn step(&mut self, ctx: &mut TickContext<'_>) -> ScenarioResult<Verdict> {
        self.run_init(ctx)?;

        match self.root.state {
            ElementState::StandbyState => {
                if self.root.poll_start(ctx)? {
                    self.root.start(ctx)?;
                }
            }
            ElementState::RunningState => self.root.run(ctx)?,
            _ => {}
        }

        if let Some(name) = self.failed_criterion(ctx)? {
            return Ok(Verdict::Failure(format!("failure criterion `{name}` fired")));
        }
        if self.root.state.is_done() {
            return Ok(Verdict::Success);
        }
        Ok(Verdict::Running)
    }

    fn run_init(&mut self, ctx: &mut TickContext<'_>) -> ScenarioResult<()> {
        for init in &mut self.init {
            if init.action.accomplished() {
                continue;
            }
            let scope = init.scope.borrow();
            let mut cx = ctx.action_context(&scope);
            if init.action.state() == ActionState::Idle {
                init.action.start(&mut cx)?;
            }
            init.action.run(&mut cx)?;
        }
        Ok(())
    }

    fn failed_criterion(&mut self, ctx: &TickContext<'_>) -> ScenarioResult<Option<String>> {
        let scope = self.root.scope.borrow();
        let snapshot = ctx.snapshot();
        for criterion in &mut self.failure_criteria {
            if criterion.trigger.evaluate(&scope, &snapshot)? {
                return Ok(Some(criterion.name.clone()));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
