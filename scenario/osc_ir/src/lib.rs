//! OSC IR - Scenario definition types for the storyboard interpreter.
//!
//! This crate holds the already-parsed form of a scenario document:
//! - Typed parameter values and declarations
//! - Storyboard element definitions (stories, acts, maneuver groups, maneuvers, events)
//! - Trigger, condition group and condition definitions
//! - Action definitions
//! - Geometry primitives shared with the world boundary
//!
//! Definitions are plain data. Enable the `serde` feature to deserialize them
//! from a document; the interpreter itself never parses text.

pub mod action;
pub mod condition;
mod geometry;
mod rule;
mod state;
pub mod storyboard;
mod value;

pub use action::{
    ActionDef, ActionKindDef, DynamicConstraintsDef, FollowingMode, LaneChangeActionDef,
    LaneChangeDynamics, LaneChangeTarget, LaneChangeTrajectory, RelativeValueType,
    SpeedActionDef, SpeedDynamics, SpeedProfileActionDef, SpeedProfileEntryDef, SpeedTarget,
    SpeedTransition, TeleportActionDef,
};
pub use condition::{
    ByEntityCondition, ConditionDef, ConditionGroupDef, ConditionKind, DistanceType,
    EntityCondition, ParameterCondition, SimulationTimeCondition,
    StoryboardElementStateCondition, TriggerDef, TriggeringEntities, TriggeringRule,
};
pub use geometry::{BoundingBox, Dimensions, LaneletId, LaneletPose, Point, Pose, Position};
pub use rule::{Rule, EQUALITY_EPSILON};
pub use state::ElementState;
pub use storyboard::{
    ActDef, CriterionDef, EntityCategory, EntityDef, EventDef, InitActionDef, ManeuverDef,
    ManeuverGroupDef, ParameterDeclaration, Priority, ScenarioDef, StoryDef, StoryboardDef,
};
pub use value::{ParameterType, ParseValueError, Scalar, Value};
