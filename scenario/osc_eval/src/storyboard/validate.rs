//! Load-time checks on storyboard definitions.

use rustc_hash::FxHashMap;

use osc_ir::{
    ActionDef, ActionKindDef, ConditionDef, ConditionKind, ElementState, EntityCondition,
    LaneChangeTarget, Position, Rule, Scalar, SpeedTarget, StoryboardDef, TriggerDef,
};

use crate::errors::{configuration, parameter_type, ScenarioError, ScenarioResult};
use crate::scope::Scope;

use super::STORYBOARD;

/// Every element name in the storyboard, with the name of its parent.
pub(super) struct ElementIndex {
    parents: FxHashMap<String, Option<String>>,
    /// Names in depth-first declaration order.
    order: Vec<String>,
}

impl ElementIndex {
    /// Collect all names, rejecting duplicates.
    pub(super) fn collect(def: &StoryboardDef) -> ScenarioResult<Self> {
        let mut index = ElementIndex {
            parents: FxHashMap::default(),
            order: Vec::new(),
        };
        index.insert(STORYBOARD, None)?;
        for story in &def.stories {
            index.insert(&story.name, Some(STORYBOARD))?;
            for act in &story.acts {
                index.insert(&act.name, Some(&story.name))?;
                for group in &act.maneuver_groups {
                    index.insert(&group.name, Some(&act.name))?;
                    for maneuver in &group.maneuvers {
                        index.insert(&maneuver.name, Some(&group.name))?;
                        for event in &maneuver.events {
                            index.insert(&event.name, Some(&maneuver.name))?;
                            for action in &event.actions {
                                index.insert(&action.name, Some(&event.name))?;
                            }
                        }
                    }
                }
            }
        }
        Ok(index)
    }

    fn insert(&mut self, name: &str, parent: Option<&str>) -> ScenarioResult<()> {
        if self.parents.contains_key(name) {
            return Err(configuration(format!(
                "storyboard element name `{name}` is used more than once"
            )));
        }
        self.parents
            .insert(name.to_string(), parent.map(str::to_string));
        self.order.push(name.to_string());
        Ok(())
    }

    pub(super) fn contains(&self, name: &str) -> bool {
        self.parents.contains_key(name)
    }

    pub(super) fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Whether `ancestor` encloses `element`.
    fn is_ancestor(&self, ancestor: &str, element: &str) -> bool {
        let mut current = self.parents.get(element).and_then(Option::as_deref);
        while let Some(name) = current {
            if name == ancestor {
                return true;
            }
            current = self.parents.get(name).and_then(Option::as_deref);
        }
        false
    }
}

/// Entity lookups at load time: a miss is a configuration problem, not a runtime one.
fn declared_entity(scope: &Scope, name: &str, user: &str) -> ScenarioResult<()> {
    scope.entity(name).map(|_| ()).map_err(|_| {
        configuration(format!("`{user}` refers to undeclared entity `{name}`"))
    })
}

fn number(scope: &Scope, scalar: &Scalar) -> ScenarioResult<()> {
    scope.number(scalar).map(|_| ())
}

pub(super) fn check_trigger(
    trigger: &TriggerDef,
    owner: &str,
    scope: &Scope,
    index: &ElementIndex,
) -> ScenarioResult<()> {
    for (position, group) in trigger.condition_groups.iter().enumerate() {
        if group.conditions.is_empty() {
            return Err(configuration(format!(
                "condition group {position} of `{owner}` has no conditions"
            )));
        }
        for condition in &group.conditions {
            check_condition(condition, scope, index)?;
        }
    }
    Ok(())
}

fn check_condition(condition: &ConditionDef, scope: &Scope, index: &ElementIndex) -> ScenarioResult<()> {
    let name = &condition.name;
    match &condition.kind {
        ConditionKind::SimulationTime(c) => number(scope, &c.value),
        ConditionKind::Parameter(c) => {
            let current = scope.lookup(&c.parameter_ref)?;
            let expected = current
                .parameter_type()
                .parse(&c.value)
                .map_err(|error| parameter_type(&c.parameter_ref, error.to_string()))?;
            if !current.is_numeric() && c.rule.apply_eq(&current, &expected).is_none() {
                return Err(parameter_type(
                    &c.parameter_ref,
                    format!(
                        "rule {} does not apply to {} values",
                        c.rule,
                        current.parameter_type()
                    ),
                ));
            }
            Ok(())
        }
        ConditionKind::StoryboardElementState(c) => {
            if index.contains(&c.element_ref) {
                Ok(())
            } else {
                Err(configuration(format!(
                    "condition `{name}` refers to unknown storyboard element `{}`",
                    c.element_ref
                )))
            }
        }
        ConditionKind::ByEntity(c) => {
            if c.triggering_entities.entity_refs.is_empty() {
                return Err(configuration(format!(
                    "condition `{name}` has no triggering entities"
                )));
            }
            for entity in &c.triggering_entities.entity_refs {
                declared_entity(scope, entity, name)?;
            }
            if let Some(entity) = c.condition.referenced_entity() {
                declared_entity(scope, entity, name)?;
            }
            match &c.condition {
                EntityCondition::RelativeDistance { value, .. }
                | EntityCondition::Speed { value, .. }
                | EntityCondition::Acceleration { value, .. } => number(scope, value),
                EntityCondition::ReachPosition { tolerance, .. } => number(scope, tolerance),
                EntityCondition::StandStill { duration, .. } => number(scope, duration),
                EntityCondition::Collision { .. } => Ok(()),
            }
        }
    }
}

pub(super) fn check_action(action: &ActionDef, scope: &Scope) -> ScenarioResult<()> {
    let name = &action.name;
    match &action.kind {
        ActionKindDef::Speed(def) => {
            match &def.target {
                SpeedTarget::Absolute { value } => number(scope, value)?,
                SpeedTarget::Relative {
                    entity_ref, value, ..
                } => {
                    declared_entity(scope, entity_ref, name)?;
                    number(scope, value)?;
                }
            }
            if let Some(rate) = &def.dynamics.rate {
                number(scope, rate)?;
            }
        }
        ActionKindDef::Teleport(def) => {
            if let Position::RelativeObject { entity_ref, .. } = &def.position {
                declared_entity(scope, entity_ref, name)?;
            }
        }
        ActionKindDef::LaneChange(def) => {
            if let LaneChangeTarget::Relative { entity_ref, .. } = &def.target {
                declared_entity(scope, entity_ref, name)?;
            }
            if let Some(velocity) = &def.dynamics.lateral_velocity {
                number(scope, velocity)?;
            }
        }
        ActionKindDef::SpeedProfile(def) => {
            if def.entries.is_empty() {
                return Err(configuration(format!(
                    "speed profile action `{name}` has no entries"
                )));
            }
            if let Some(entity_ref) = &def.entity_ref {
                declared_entity(scope, entity_ref, name)?;
            }
            if let Some(constraints) = &def.dynamic_constraints {
                number(scope, &constraints.max_acceleration)?;
                number(scope, &constraints.max_deceleration)?;
                if let Some(speed) = &constraints.max_speed {
                    number(scope, speed)?;
                }
            }
            for entry in &def.entries {
                number(scope, &entry.speed)?;
                if let Some(time) = &entry.time {
                    number(scope, time)?;
                }
            }
        }
    }
    Ok(())
}

/// Whether `trigger`, as the start trigger of `element`, can never be true while
/// `element`'s parent runs.
///
/// Only non-empty triggers qualify, and only when every group holds a condition
/// that cannot hold at that point: an ancestor already finished, the element or
/// one of its descendants already started, or a time limit that has passed
/// before the first tick.
pub(super) fn never_fires(
    trigger: &TriggerDef,
    element: &str,
    scope: &Scope,
    index: &ElementIndex,
) -> bool {
    !trigger.is_empty()
        && trigger.condition_groups.iter().all(|group| {
            group
                .conditions
                .iter()
                .any(|condition| unsatisfiable(condition, element, scope, index))
        })
}

fn unsatisfiable(condition: &ConditionDef, element: &str, scope: &Scope, index: &ElementIndex) -> bool {
    match &condition.kind {
        ConditionKind::StoryboardElementState(c) => {
            let target = c.element_ref.as_str();
            if index.is_ancestor(target, element) {
                matches!(
                    c.state,
                    ElementState::EndTransition
                        | ElementState::StopTransition
                        | ElementState::SkipTransition
                        | ElementState::CompleteState
                )
            } else if target == element || index.is_ancestor(element, target) {
                matches!(
                    c.state,
                    ElementState::StartTransition
                        | ElementState::RunningState
                        | ElementState::EndTransition
                )
            } else {
                false
            }
        }
        ConditionKind::SimulationTime(c) => match scope.number(&c.value) {
            Ok(limit) => match c.rule {
                // The first evaluation happens after one positive step.
                Rule::LessThan | Rule::LessOrEqual | Rule::EqualTo => limit <= 0.0,
                _ => false,
            },
            Err(_) => false,
        },
        ConditionKind::Parameter(_) | ConditionKind::ByEntity(_) => false,
    }
}

/// Load-time error for an element that could never start.
pub(super) fn unreachable_element(element: &str) -> ScenarioError {
    configuration(format!(
        "`{element}` is required but its start trigger can never fire while its parent runs"
    ))
}
