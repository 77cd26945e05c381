//! Storyboard scheduling driven through `Interpreter` against a kinematic world.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use osc_eval::{Interpreter, Verdict};
use osc_ir::{
    ActDef, ActionDef, ActionKindDef, BoundingBox, ConditionDef, CriterionDef, ElementState,
    EntityCondition, EntityDef, EventDef, InitActionDef, ManeuverDef, ManeuverGroupDef, Pose,
    Position, Priority, Rule, ScenarioDef, SpeedActionDef, SpeedDynamics, StoryDef,
    StoryboardDef, TeleportActionDef, TriggerDef,
};
use osc_world::{Instruction, KinematicWorld, StraightRoad, WorldQuery};
use pretty_assertions::assert_eq;

const DT: f64 = 0.1;

fn scenario(events: Vec<EventDef>) -> ScenarioDef {
    ScenarioDef {
        entities: vec![EntityDef::vehicle("ego"), EntityDef::vehicle("npc")],
        storyboard: StoryboardDef {
            stories: vec![StoryDef {
                name: "story".to_string(),
                acts: vec![ActDef {
                    name: "act".to_string(),
                    maneuver_groups: vec![ManeuverGroupDef {
                        name: "group".to_string(),
                        actors: vec!["ego".to_string()],
                        maneuvers: vec![ManeuverDef {
                            name: "maneuver".to_string(),
                            events,
                            ..ManeuverDef::default()
                        }],
                        ..ManeuverGroupDef::default()
                    }],
                    ..ActDef::default()
                }],
                ..StoryDef::default()
            }],
            ..StoryboardDef::default()
        },
        ..ScenarioDef::default()
    }
}

fn world() -> KinematicWorld {
    let mut world = KinematicWorld::new(StraightRoad::default());
    world.spawn("ego", BoundingBox::default(), Pose::new(0.0, 0.0, 0.0), 0.0);
    world.spawn("npc", BoundingBox::default(), Pose::new(40.0, 0.0, 0.0), 0.0);
    world
}

fn teleport(name: &str, x: f64) -> ActionDef {
    ActionDef::new(
        name,
        ActionKindDef::Teleport(TeleportActionDef {
            position: Position::World(Pose::new(x, 0.0, 0.0)),
        }),
    )
}

fn linear_speed(name: &str, target: f64, rate: f64) -> ActionDef {
    ActionDef::new(
        name,
        ActionKindDef::Speed(SpeedActionDef::absolute(target, SpeedDynamics::linear(rate))),
    )
}

fn step_speed(name: &str, target: f64) -> ActionDef {
    ActionDef::new(
        name,
        ActionKindDef::Speed(SpeedActionDef::absolute(target, SpeedDynamics::step())),
    )
}

fn after(name: &str, time: f64) -> TriggerDef {
    TriggerDef::single(ConditionDef::simulation_time(name, Rule::GreaterThan, time))
}

fn event(name: &str, trigger: TriggerDef, action: ActionDef) -> EventDef {
    EventDef::new(name, trigger, vec![action])
}

fn tick_n(interpreter: &mut Interpreter<KinematicWorld>, n: usize) -> Verdict {
    let mut verdict = Verdict::Running;
    for _ in 0..n {
        verdict = interpreter.tick(DT);
    }
    verdict
}

fn finish(interpreter: &mut Interpreter<KinematicWorld>) -> Verdict {
    for _ in 0..10_000 {
        let verdict = interpreter.tick(DT);
        if verdict.is_terminal() {
            return verdict;
        }
    }
    panic!("scenario did not finish");
}

#[test]
fn test_later_sibling_sees_transition_in_same_tick() {
    let chained = TriggerDef::single(ConditionDef::element_state(
        "first_done",
        "first",
        ElementState::EndTransition,
    ));
    let def = scenario(vec![
        event("first", TriggerDef::default(), teleport("to_10", 10.0)),
        event("second", chained, teleport("to_20", 20.0)),
    ]);
    let mut interpreter = Interpreter::new(&def, world()).unwrap();

    assert_eq!(interpreter.tick(DT), Verdict::Running);
    assert_eq!(interpreter.element_state("first"), Some(ElementState::EndTransition));
    assert_eq!(interpreter.element_state("second"), Some(ElementState::EndTransition));
    assert_eq!(
        interpreter.simulation().entity("ego").map(|e| e.pose.position.x),
        Some(20.0)
    );
    assert_eq!(finish(&mut interpreter), Verdict::Success);
}

#[test]
fn test_event_reruns_up_to_its_execution_count() {
    let mut repeat = event("repeat", TriggerDef::default(), teleport("hop", 5.0));
    repeat.maximum_execution_count = 3;
    let mut interpreter = Interpreter::new(&scenario(vec![repeat]), world()).unwrap();

    interpreter.tick(DT);
    assert_eq!(interpreter.element_state("repeat"), Some(ElementState::EndTransition));
    interpreter.tick(DT);
    assert_eq!(interpreter.element_state("repeat"), Some(ElementState::EndTransition));
    assert_eq!(interpreter.storyboard().find("repeat").unwrap().executions(), 2);

    assert_eq!(finish(&mut interpreter), Verdict::Success);
    assert_eq!(interpreter.storyboard().find("repeat").unwrap().executions(), 3);
    let hops = interpreter
        .simulation()
        .applied()
        .iter()
        .filter(|applied| matches!(applied.instruction, Instruction::Teleport(_)))
        .count();
    assert_eq!(hops, 3);
}

#[test]
fn test_held_trigger_reruns_event() {
    let mut repeat = event("repeat", after("past_start", 0.05), teleport("hop", 5.0));
    repeat.maximum_execution_count = 2;
    let mut interpreter = Interpreter::new(&scenario(vec![repeat]), world()).unwrap();

    assert_eq!(finish(&mut interpreter), Verdict::Success);
    assert_eq!(interpreter.storyboard().find("repeat").unwrap().executions(), 2);
    let hops = interpreter
        .simulation()
        .applied()
        .iter()
        .filter(|applied| matches!(applied.instruction, Instruction::Teleport(_)))
        .count();
    assert_eq!(hops, 2);
}

#[test]
fn test_overwrite_stops_running_sibling() {
    let mut brake = event("brake", after("half_second", 0.5), step_speed("stop", 0.0));
    brake.priority = Priority::Overwrite;
    let def = scenario(vec![
        event("cruise", TriggerDef::default(), linear_speed("speed_up", 20.0, 1.0)),
        brake,
    ]);
    let mut interpreter = Interpreter::new(&def, world()).unwrap();

    tick_n(&mut interpreter, 5);
    assert_eq!(interpreter.element_state("cruise"), Some(ElementState::RunningState));
    assert_eq!(interpreter.element_state("brake"), Some(ElementState::StandbyState));

    interpreter.tick(DT);
    assert_eq!(interpreter.element_state("cruise"), Some(ElementState::StopTransition));
    assert_eq!(interpreter.element_state("speed_up"), Some(ElementState::StopTransition));
    assert_eq!(interpreter.element_state("brake"), Some(ElementState::StartTransition));
    assert_eq!(
        interpreter.simulation().entity("ego").map(|e| e.speed),
        Some(0.0)
    );

    assert_eq!(finish(&mut interpreter), Verdict::Success);
    assert_eq!(interpreter.element_state("cruise"), Some(ElementState::CompleteState));
}

#[test]
fn test_skip_does_not_start_while_sibling_runs() {
    let mut brake = event("brake", after("half_second", 0.5), step_speed("stop", 0.0));
    brake.priority = Priority::Skip;
    let def = scenario(vec![
        event("cruise", TriggerDef::default(), linear_speed("speed_up", 20.0, 1.0)),
        brake,
    ]);
    let mut interpreter = Interpreter::new(&def, world()).unwrap();

    assert_eq!(tick_n(&mut interpreter, 30), Verdict::Running);
    assert_eq!(interpreter.element_state("cruise"), Some(ElementState::RunningState));
    assert_eq!(interpreter.element_state("brake"), Some(ElementState::StandbyState));
    assert!(interpreter.simulation().entity("ego").unwrap().speed > 2.0);
}

#[test]
fn test_act_stop_trigger_stops_everything_below() {
    let mut def = scenario(vec![event(
        "cruise",
        TriggerDef::default(),
        linear_speed("speed_up", 20.0, 1.0),
    )]);
    def.storyboard.stories[0].acts[0].stop_trigger = Some(after("quarter_second", 0.25));
    let mut interpreter = Interpreter::new(&def, world()).unwrap();

    tick_n(&mut interpreter, 3);
    for name in ["act", "group", "maneuver", "cruise", "speed_up"] {
        assert_eq!(
            interpreter.element_state(name),
            Some(ElementState::StopTransition),
            "{name}"
        );
    }
    assert_eq!(interpreter.element_state("story"), Some(ElementState::RunningState));

    assert_eq!(interpreter.tick(DT), Verdict::Running);
    assert_eq!(interpreter.element_state("story"), Some(ElementState::EndTransition));
    assert_eq!(interpreter.tick(DT), Verdict::Success);
    assert_eq!(interpreter.ticks(), 5);
}

#[test]
fn test_storyboard_stop_trigger_ends_the_run() {
    let mut def = scenario(vec![event(
        "cruise",
        TriggerDef::default(),
        linear_speed("speed_up", 20.0, 1.0),
    )]);
    def.storyboard.stop_trigger = after("quarter_second", 0.25);
    let mut interpreter = Interpreter::new(&def, world()).unwrap();

    assert_eq!(tick_n(&mut interpreter, 2), Verdict::Running);
    assert_eq!(interpreter.tick(DT), Verdict::Success);
    assert_eq!(interpreter.element_state("cruise"), Some(ElementState::StopTransition));
}

#[test]
fn test_failure_criterion_fails_the_run() {
    let mut def = scenario(vec![event(
        "cruise",
        TriggerDef::default(),
        linear_speed("speed_up", 20.0, 10.0),
    )]);
    def.storyboard.failure_criteria = vec![CriterionDef {
        name: "too_fast".to_string(),
        trigger: TriggerDef::single(ConditionDef::by_entity(
            "ego_speed",
            &["ego"],
            EntityCondition::Speed {
                rule: Rule::GreaterThan,
                value: 5.0.into(),
            },
        )),
    }];
    let mut interpreter = Interpreter::new(&def, world()).unwrap();

    assert_eq!(
        finish(&mut interpreter),
        Verdict::Failure("failure criterion `too_fast` fired".to_string())
    );
    assert_eq!(interpreter.ticks(), 7);
}

#[test]
fn test_optional_event_does_not_block_completion() {
    let mut never = event("never", after("much_later", 1000.0), teleport("away", 99.0));
    never.optional = true;
    let def = scenario(vec![
        event("jump", TriggerDef::default(), teleport("to_10", 10.0)),
        never,
    ]);
    let mut interpreter = Interpreter::new(&def, world()).unwrap();

    tick_n(&mut interpreter, 2);
    assert_eq!(interpreter.element_state("maneuver"), Some(ElementState::EndTransition));
    assert_eq!(interpreter.element_state("never"), Some(ElementState::SkipTransition));
    assert_eq!(interpreter.element_state("away"), Some(ElementState::SkipTransition));
    assert_eq!(finish(&mut interpreter), Verdict::Success);
}

#[test]
fn test_init_actions_apply_before_stories_are_polled() {
    let fast = TriggerDef::single(ConditionDef::by_entity(
        "ego_moving",
        &["ego"],
        EntityCondition::Speed {
            rule: Rule::GreaterThan,
            value: 7.0.into(),
        },
    ));
    let mut def = scenario(vec![event("react", fast, teleport("to_10", 10.0))]);
    def.storyboard.init = vec![InitActionDef {
        entity_ref: "ego".to_string(),
        action: step_speed("initial_speed", 8.0),
    }];
    let mut interpreter = Interpreter::new(&def, world()).unwrap();

    interpreter.tick(DT);
    assert_eq!(interpreter.element_state("react"), Some(ElementState::EndTransition));
    let init = &interpreter.storyboard().init_actions()[0];
    assert!(!init.action().accomplished());

    interpreter.tick(DT);
    assert!(interpreter.storyboard().init_actions()[0].action().accomplished());
}

#[test]
fn test_condition_on_missing_entity_is_an_error() {
    let near = TriggerDef::single(ConditionDef::by_entity(
        "npc_moving",
        &["npc"],
        EntityCondition::Speed {
            rule: Rule::GreaterThan,
            value: 1.0.into(),
        },
    ));
    let def = scenario(vec![event("react", near, teleport("to_10", 10.0))]);
    let mut world = KinematicWorld::new(StraightRoad::default());
    world.spawn("ego", BoundingBox::default(), Pose::new(0.0, 0.0, 0.0), 0.0);
    let mut interpreter = Interpreter::new(&def, world).unwrap();

    assert_eq!(
        interpreter.tick(DT),
        Verdict::Error("entity `npc` does not exist".to_string())
    );
}

#[test]
fn test_required_child_that_never_fires_fails_at_load() {
    let waiting = TriggerDef::single(ConditionDef::element_state(
        "after_story",
        "story",
        ElementState::CompleteState,
    ));
    let def = scenario(vec![event("late", waiting, teleport("to_10", 10.0))]);
    let error = Interpreter::new(&def, world()).err().unwrap();
    assert!(error.is_load_time());
    assert!(error.to_string().contains("`late` is required"));
}
