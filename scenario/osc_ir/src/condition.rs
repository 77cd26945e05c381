//! Trigger and condition definitions.

use crate::geometry::Position;
use crate::rule::Rule;
use crate::state::ElementState;
use crate::value::Scalar;

/// OR over condition groups. An empty trigger is unconditionally true.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct TriggerDef {
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition_groups: Vec<ConditionGroupDef>,
}

impl TriggerDef {
    pub fn new(condition_groups: Vec<ConditionGroupDef>) -> Self {
        TriggerDef { condition_groups }
    }

    /// A trigger holding a single group with a single condition.
    pub fn single(condition: ConditionDef) -> Self {
        TriggerDef {
            condition_groups: vec![ConditionGroupDef::new(vec![condition])],
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.condition_groups.is_empty()
    }

    /// Every condition in declaration order.
    pub fn conditions(&self) -> impl Iterator<Item = &ConditionDef> {
        self.condition_groups.iter().flat_map(|g| g.conditions.iter())
    }
}

/// AND over conditions.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ConditionGroupDef {
    pub conditions: Vec<ConditionDef>,
}

impl ConditionGroupDef {
    pub fn new(conditions: Vec<ConditionDef>) -> Self {
        ConditionGroupDef { conditions }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ConditionDef {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: ConditionKind,
}

impl ConditionDef {
    pub fn new(name: impl Into<String>, kind: ConditionKind) -> Self {
        ConditionDef {
            name: name.into(),
            kind,
        }
    }

    pub fn simulation_time(name: impl Into<String>, rule: Rule, value: impl Into<Scalar>) -> Self {
        Self::new(
            name,
            ConditionKind::SimulationTime(SimulationTimeCondition {
                rule,
                value: value.into(),
            }),
        )
    }

    pub fn element_state(
        name: impl Into<String>,
        element_ref: impl Into<String>,
        state: ElementState,
    ) -> Self {
        Self::new(
            name,
            ConditionKind::StoryboardElementState(StoryboardElementStateCondition {
                element_ref: element_ref.into(),
                state,
            }),
        )
    }

    /// Entity condition evaluated for the listed entities with `any` semantics.
    pub fn by_entity(
        name: impl Into<String>,
        entity_refs: &[&str],
        condition: EntityCondition,
    ) -> Self {
        Self::new(
            name,
            ConditionKind::ByEntity(ByEntityCondition {
                triggering_entities: TriggeringEntities {
                    rule: TriggeringRule::Any,
                    entity_refs: entity_refs.iter().map(|e| (*e).to_string()).collect(),
                },
                condition,
            }),
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum ConditionKind {
    SimulationTime(SimulationTimeCondition),
    Parameter(ParameterCondition),
    StoryboardElementState(StoryboardElementStateCondition),
    ByEntity(ByEntityCondition),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct SimulationTimeCondition {
    pub rule: Rule,
    pub value: Scalar,
}

/// Compares a declared parameter against a raw value parsed as the parameter's type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ParameterCondition {
    pub parameter_ref: String,
    pub rule: Rule,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct StoryboardElementStateCondition {
    pub element_ref: String,
    pub state: ElementState,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ByEntityCondition {
    pub triggering_entities: TriggeringEntities,
    pub condition: EntityCondition,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct TriggeringEntities {
    #[cfg_attr(feature = "serde", serde(default))]
    pub rule: TriggeringRule,
    pub entity_refs: Vec<String>,
}

/// Whether any or all triggering entities must satisfy an entity condition.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum TriggeringRule {
    #[default]
    Any,
    All,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum EntityCondition {
    /// Distance from each triggering entity to `entity_ref`.
    RelativeDistance {
        entity_ref: String,
        distance_type: DistanceType,
        #[cfg_attr(feature = "serde", serde(default))]
        freespace: bool,
        #[cfg_attr(feature = "serde", serde(default))]
        allow_lane_change: bool,
        rule: Rule,
        value: Scalar,
    },
    Speed {
        rule: Rule,
        value: Scalar,
    },
    Acceleration {
        rule: Rule,
        value: Scalar,
    },
    ReachPosition {
        position: Position,
        tolerance: Scalar,
    },
    /// Time the entity has been standing still, compared against `duration`.
    StandStill {
        rule: Rule,
        duration: Scalar,
    },
    Collision {
        entity_ref: String,
    },
}

impl EntityCondition {
    /// Entity names the condition references beyond its triggering entities.
    pub fn referenced_entity(&self) -> Option<&str> {
        match self {
            EntityCondition::RelativeDistance { entity_ref, .. }
            | EntityCondition::Collision { entity_ref } => Some(entity_ref),
            EntityCondition::ReachPosition {
                position: Position::RelativeObject { entity_ref, .. },
                ..
            } => Some(entity_ref),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum DistanceType {
    Cartesian,
    Longitudinal,
    Lateral,
}
