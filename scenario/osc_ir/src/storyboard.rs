//! Scenario and storyboard element definitions.
//!
//! This is the tree a deserializer hands to the interpreter. Nothing here is
//! validated; `osc_eval` checks the tree when it is loaded.

use crate::action::ActionDef;
use crate::condition::TriggerDef;
use crate::geometry::BoundingBox;
use crate::value::ParameterType;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ParameterDeclaration {
    pub name: String,
    pub parameter_type: ParameterType,
    pub value: String,
}

impl ParameterDeclaration {
    pub fn new(
        name: impl Into<String>,
        parameter_type: ParameterType,
        value: impl Into<String>,
    ) -> Self {
        ParameterDeclaration {
            name: name.into(),
            parameter_type,
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ScenarioDef {
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameter_declarations: Vec<ParameterDeclaration>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub entities: Vec<EntityDef>,
    pub storyboard: StoryboardDef,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum EntityCategory {
    #[default]
    Vehicle,
    Pedestrian,
    MiscObject,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct EntityDef {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: EntityCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bounding_box: BoundingBox,
}

impl EntityDef {
    pub fn vehicle(name: impl Into<String>) -> Self {
        EntityDef {
            name: name.into(),
            category: EntityCategory::Vehicle,
            bounding_box: BoundingBox::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct StoryboardDef {
    pub init: Vec<InitActionDef>,
    pub stories: Vec<StoryDef>,
    /// Ends the run when it fires.
    pub stop_trigger: TriggerDef,
    /// Pass/fail criteria: the run fails as soon as any of these triggers is true.
    pub failure_criteria: Vec<CriterionDef>,
}

/// A private action applied to one entity when the storyboard starts.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct InitActionDef {
    pub entity_ref: String,
    pub action: ActionDef,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct CriterionDef {
    pub name: String,
    pub trigger: TriggerDef,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct StoryDef {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameter_declarations: Vec<ParameterDeclaration>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub start_trigger: TriggerDef,
    #[cfg_attr(feature = "serde", serde(default))]
    pub optional: bool,
    pub acts: Vec<ActDef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ActDef {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub start_trigger: TriggerDef,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stop_trigger: Option<TriggerDef>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub optional: bool,
    pub maneuver_groups: Vec<ManeuverGroupDef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ManeuverGroupDef {
    pub name: String,
    pub actors: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub start_trigger: TriggerDef,
    #[cfg_attr(feature = "serde", serde(default))]
    pub optional: bool,
    pub maneuvers: Vec<ManeuverDef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ManeuverDef {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameter_declarations: Vec<ParameterDeclaration>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub start_trigger: TriggerDef,
    #[cfg_attr(feature = "serde", serde(default))]
    pub optional: bool,
    pub events: Vec<EventDef>,
}

/// What an event does to running sibling events when it starts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum Priority {
    /// Stop running siblings.
    Overwrite,
    /// Do not start while a sibling runs.
    Skip,
    /// Ignore siblings.
    #[default]
    Parallel,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct EventDef {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: Priority,
    #[cfg_attr(
        feature = "serde",
        serde(default = "default_maximum_execution_count")
    )]
    pub maximum_execution_count: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub start_trigger: TriggerDef,
    #[cfg_attr(feature = "serde", serde(default))]
    pub optional: bool,
    pub actions: Vec<ActionDef>,
}

#[cfg(feature = "serde")]
fn default_maximum_execution_count() -> u32 {
    1
}

impl EventDef {
    pub fn new(name: impl Into<String>, start_trigger: TriggerDef, actions: Vec<ActionDef>) -> Self {
        EventDef {
            name: name.into(),
            start_trigger,
            actions,
            ..EventDef::default()
        }
    }
}

impl Default for EventDef {
    fn default() -> Self {
        EventDef {
            name: String::new(),
            priority: Priority::Parallel,
            maximum_execution_count: 1,
            start_trigger: TriggerDef::default(),
            optional: false,
            actions: Vec::new(),
        }
    }
}
