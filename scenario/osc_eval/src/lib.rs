//! OSC Eval - Storyboard interpreter for OpenSCENARIO-style driving scenarios.
//!
//! Given a [`ScenarioDef`](osc_ir::ScenarioDef) and a [`Simulation`](osc_world::Simulation),
//! [`Interpreter`] steps the storyboard one `tick(dt)` at a time and reports a
//! [`Verdict`].
//!
//! # Architecture
//!
//! - `Scope`: parameter, entity and actor bindings, one scope per element
//! - `condition::evaluate`: pure condition evaluation against a `Snapshot`
//! - `Trigger`: OR of AND-groups with an edge latch
//! - `Action`: per-actor cursors over an action's entries
//! - `Storyboard`: the element tree, its scheduling and load-time checks
//! - `Interpreter`: time, settle pass and verdicts
//!
//! # Re-exports
//!
//! Error constructors are re-exported at the crate root; the canonical path is
//! `osc_eval::errors::*`.

pub mod action;
pub mod condition;
pub mod dump;
pub mod errors;
pub mod interpreter;
mod position;
pub mod scope;
mod states;
pub mod storyboard;
pub mod trigger;

pub use action::{Action, ActionContext, ActionState, LANE_OFFSET_TOLERANCE, SPEED_TOLERANCE};
pub use condition::Snapshot;
pub use dump::dump_storyboard;
pub use errors::{
    // Parameter errors
    declaration, parameter_type, undeclared_parameter,
    // Runtime errors
    invalid_state, rejected, unknown_entity,
    // Configuration errors
    configuration,
    ScenarioError, ScenarioResult,
};
pub use interpreter::{Interpreter, Verdict};
pub use scope::{EntityRef, LocalScope, Scope};
pub use states::ElementStates;
pub use storyboard::{ElementKind, Node, Storyboard, STORYBOARD};
pub use trigger::Trigger;
