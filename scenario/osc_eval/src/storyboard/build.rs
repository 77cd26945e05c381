//! Turning a `ScenarioDef` into a runnable `Storyboard`.
//!
//! Everything that can be checked without running is checked here, so a
//! storyboard that loads only fails at run time because of what the world does.

use osc_ir::{
    ActDef, CriterionDef, ElementState, EventDef, InitActionDef, ManeuverDef, ManeuverGroupDef,
    ParameterDeclaration, ScenarioDef, StoryDef, TriggerDef,
};
use tracing::debug;

use crate::action::Action;
use crate::errors::{configuration, ScenarioResult};
use crate::scope::{EntityRef, LocalScope, Scope};
use crate::states::ElementStates;
use crate::trigger::Trigger;

use super::validate::{
    check_action, check_trigger, never_fires, unreachable_element, ElementIndex,
};
use super::{
    ActionNode, Body, Criterion, ElementKind, EventBody, InitAction, Node, Storyboard, STORYBOARD,
};

/// Validate `def` and build its storyboard, with every element registered in standby.
pub fn build(def: &ScenarioDef) -> ScenarioResult<(Storyboard, ElementStates)> {
    let index = ElementIndex::collect(&def.storyboard)?;

    let root_scope = LocalScope::new(Scope::new());
    {
        let mut scope = root_scope.borrow_mut();
        declare_all(&mut scope, &def.parameter_declarations)?;
        for entity in &def.entities {
            if scope.entity(&entity.name).is_ok() {
                return Err(configuration(format!(
                    "entity `{}` is declared more than once",
                    entity.name
                )));
            }
            scope.define_entity(EntityRef::from(entity));
        }
    }

    let builder = Builder { index: &index };
    let storyboard = &def.storyboard;

    let init = storyboard
        .init
        .iter()
        .map(|init| builder.init_action(init, &root_scope))
        .collect::<ScenarioResult<Vec<_>>>()?;

    let stories = storyboard
        .stories
        .iter()
        .map(|story| builder.story(story, &root_scope))
        .collect::<ScenarioResult<Vec<_>>>()?;

    let stop_trigger = builder.stop_trigger(&storyboard.stop_trigger, STORYBOARD, &root_scope)?;

    let failure_criteria = storyboard
        .failure_criteria
        .iter()
        .map(|criterion| builder.criterion(criterion, &root_scope))
        .collect::<ScenarioResult<Vec<_>>>()?;

    let root = Node {
        name: STORYBOARD.to_string(),
        kind: ElementKind::Storyboard,
        scope: root_scope,
        start_trigger: Trigger::default(),
        stop_trigger,
        optional: false,
        state: ElementState::StandbyState,
        body: Body::Children(stories),
    };

    let mut states = ElementStates::new();
    for name in index.names() {
        states.register(name);
    }
    debug!(
        elements = states.len(),
        init = init.len(),
        criteria = failure_criteria.len(),
        "storyboard loaded"
    );

    Ok((
        Storyboard {
            root,
            init,
            failure_criteria,
        },
        states,
    ))
}

fn declare_all(scope: &mut Scope, declarations: &[ParameterDeclaration]) -> ScenarioResult<()> {
    for declaration in declarations {
        scope.declare(
            &declaration.name,
            declaration.parameter_type,
            &declaration.value,
        )?;
    }
    Ok(())
}

struct Builder<'a> {
    index: &'a ElementIndex,
}

impl Builder<'_> {
    fn init_action(
        &self,
        def: &InitActionDef,
        root: &LocalScope<Scope>,
    ) -> ScenarioResult<InitAction> {
        let scope = root.child();
        {
            let mut inner = scope.borrow_mut();
            if inner.entity(&def.entity_ref).is_err() {
                return Err(configuration(format!(
                    "init action `{}` targets undeclared entity `{}`",
                    def.action.name, def.entity_ref
                )));
            }
            inner.set_actors(vec![def.entity_ref.clone()]);
            check_action(&def.action, &inner)?;
        }
        Ok(InitAction {
            entity: def.entity_ref.clone(),
            scope,
            action: Action::new(def.action.clone()),
        })
    }

    fn criterion(&self, def: &CriterionDef, root: &LocalScope<Scope>) -> ScenarioResult<Criterion> {
        if def.trigger.is_empty() {
            return Err(configuration(format!(
                "failure criterion `{}` has no conditions",
                def.name
            )));
        }
        check_trigger(&def.trigger, &def.name, &root.borrow(), self.index)?;
        Ok(Criterion {
            name: def.name.clone(),
            trigger: Trigger::new(def.trigger.clone()),
        })
    }

    /// An empty stop trigger means the element is never stopped.
    fn stop_trigger(
        &self,
        def: &TriggerDef,
        owner: &str,
        scope: &LocalScope<Scope>,
    ) -> ScenarioResult<Option<Trigger>> {
        if def.is_empty() {
            return Ok(None);
        }
        check_trigger(def, owner, &scope.borrow(), self.index)?;
        Ok(Some(Trigger::new(def.clone())))
    }

    fn node(
        &self,
        name: &str,
        kind: ElementKind,
        scope: LocalScope<Scope>,
        start_trigger: &TriggerDef,
        optional: bool,
        body: Body,
    ) -> ScenarioResult<Node> {
        {
            let inner = scope.borrow();
            check_trigger(start_trigger, name, &inner, self.index)?;
            if !optional && never_fires(start_trigger, name, &inner, self.index) {
                return Err(unreachable_element(name));
            }
        }
        Ok(Node {
            name: name.to_string(),
            kind,
            scope,
            start_trigger: Trigger::new(start_trigger.clone()),
            stop_trigger: None,
            optional,
            state: ElementState::StandbyState,
            body,
        })
    }

    fn story(&self, def: &StoryDef, parent: &LocalScope<Scope>) -> ScenarioResult<Node> {
        let scope = parent.child();
        declare_all(&mut scope.borrow_mut(), &def.parameter_declarations)?;
        let acts = def
            .acts
            .iter()
            .map(|act| self.act(act, &scope))
            .collect::<ScenarioResult<Vec<_>>>()?;
        self.node(
            &def.name,
            ElementKind::Story,
            scope,
            &def.start_trigger,
            def.optional,
            Body::Children(acts),
        )
    }

    fn act(&self, def: &ActDef, parent: &LocalScope<Scope>) -> ScenarioResult<Node> {
        let scope = parent.child();
        let groups = def
            .maneuver_groups
            .iter()
            .map(|group| self.maneuver_group(group, &scope))
            .collect::<ScenarioResult<Vec<_>>>()?;
        let stop_trigger = match &def.stop_trigger {
            Some(trigger) => self.stop_trigger(trigger, &def.name, &scope)?,
            None => None,
        };
        let mut node = self.node(
            &def.name,
            ElementKind::Act,
            scope,
            &def.start_trigger,
            def.optional,
            Body::Children(groups),
        )?;
        node.stop_trigger = stop_trigger;
        Ok(node)
    }

    fn maneuver_group(
        &self,
        def: &ManeuverGroupDef,
        parent: &LocalScope<Scope>,
    ) -> ScenarioResult<Node> {
        let scope = parent.child();
        {
            let mut inner = scope.borrow_mut();
            for actor in &def.actors {
                if inner.entity(actor).is_err() {
                    return Err(configuration(format!(
                        "maneuver group `{}` names undeclared actor `{actor}`",
                        def.name
                    )));
                }
            }
            inner.set_actors(def.actors.clone());
        }
        let maneuvers = def
            .maneuvers
            .iter()
            .map(|maneuver| self.maneuver(maneuver, &scope))
            .collect::<ScenarioResult<Vec<_>>>()?;
        self.node(
            &def.name,
            ElementKind::ManeuverGroup,
            scope,
            &def.start_trigger,
            def.optional,
            Body::Children(maneuvers),
        )
    }

    fn maneuver(&self, def: &ManeuverDef, parent: &LocalScope<Scope>) -> ScenarioResult<Node> {
        let scope = parent.child();
        declare_all(&mut scope.borrow_mut(), &def.parameter_declarations)?;
        let events = def
            .events
            .iter()
            .map(|event| self.event(event, &scope))
            .collect::<ScenarioResult<Vec<_>>>()?;
        self.node(
            &def.name,
            ElementKind::Maneuver,
            scope,
            &def.start_trigger,
            def.optional,
            Body::Children(events),
        )
    }

    fn event(&self, def: &EventDef, parent: &LocalScope<Scope>) -> ScenarioResult<Node> {
        if def.actions.is_empty() {
            return Err(configuration(format!("event `{}` has no actions", def.name)));
        }
        if def.maximum_execution_count == 0 {
            return Err(configuration(format!(
                "event `{}` has a maximum execution count of zero",
                def.name
            )));
        }
        let scope = parent.child();
        let actions = {
            let inner = scope.borrow();
            def.actions
                .iter()
                .map(|action| -> ScenarioResult<ActionNode> {
                    check_action(action, &inner)?;
                    Ok(ActionNode::new(Action::new(action.clone())))
                })
                .collect::<ScenarioResult<Vec<_>>>()?
        };
        self.node(
            &def.name,
            ElementKind::Event,
            scope,
            &def.start_trigger,
            def.optional,
            Body::Event(EventBody {
                priority: def.priority,
                maximum_execution_count: def.maximum_execution_count,
                executions: 0,
                actions,
            }),
        )
    }
}
