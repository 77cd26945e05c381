use super::*;
use osc_ir::{
    BoundingBox, ConditionGroupDef, DistanceType, EntityCondition, Pose, Rule, Scalar,
};
use osc_world::{KinematicWorld, StraightRoad};

use crate::states::ElementStates;

fn time_at_least(name: &str, seconds: f64) -> ConditionDef {
    ConditionDef::simulation_time(name, Rule::GreaterOrEqual, seconds)
}

fn world(ego_x: f64, npc_x: f64) -> KinematicWorld {
    let mut world = KinematicWorld::new(StraightRoad::default());
    world.spawn("ego", BoundingBox::default(), Pose::new(ego_x, 0.0, 0.0), 0.0);
    world.spawn("npc", BoundingBox::default(), Pose::new(npc_x, 0.0, 0.0), 0.0);
    world
}

#[test]
fn test_empty_trigger_is_true() {
    let scope = Scope::new();
    let world = world(0.0, 10.0);
    let states = ElementStates::new();
    let mut trigger = Trigger::new(TriggerDef::default());

    assert!(trigger.evaluate(&scope, &Snapshot::new(0.0, &world, &states)).unwrap());
    assert!(trigger.current_value());
}

#[test]
fn test_two_groups_or_semantics() {
    let close = ConditionDef::by_entity(
        "close",
        &["ego"],
        EntityCondition::RelativeDistance {
            entity_ref: "npc".to_string(),
            distance_type: DistanceType::Cartesian,
            freespace: false,
            allow_lane_change: false,
            rule: Rule::LessThan,
            value: Scalar::Literal(2.0),
        },
    );
    let mut trigger = Trigger::new(TriggerDef::new(vec![
        ConditionGroupDef::new(vec![time_at_least("a", 5.0)]),
        ConditionGroupDef::new(vec![time_at_least("b", 10.0), close]),
    ]));
    let scope = Scope::new();
    let states = ElementStates::new();

    let far = world(0.0, 10.0);
    assert!(!trigger.evaluate(&scope, &Snapshot::new(4.0, &far, &states)).unwrap());
    assert!(trigger.evaluate(&scope, &Snapshot::new(6.0, &far, &states)).unwrap());

    let near = world(0.0, 1.5);
    assert!(trigger.evaluate(&scope, &Snapshot::new(11.0, &near, &states)).unwrap());
}

#[test]
fn test_rising_edge_fires_once_while_held() {
    let mut trigger = Trigger::new(TriggerDef::single(time_at_least("t", 1.0)));
    let scope = Scope::new();
    let states = ElementStates::new();
    let world = world(0.0, 10.0);

    assert!(!trigger.rising(&scope, &Snapshot::new(0.5, &world, &states)).unwrap());
    assert!(trigger.rising(&scope, &Snapshot::new(1.0, &world, &states)).unwrap());
    assert!(!trigger.rising(&scope, &Snapshot::new(1.5, &world, &states)).unwrap());
    assert!(trigger.current_value());
}

#[test]
fn test_activated_repeats_only_for_empty_triggers() {
    let scope = Scope::new();
    let states = ElementStates::new();
    let world = world(0.0, 10.0);
    let snapshot = Snapshot::new(2.0, &world, &states);

    let mut empty = Trigger::default();
    assert!(empty.activated(&scope, &snapshot).unwrap());
    assert!(empty.activated(&scope, &snapshot).unwrap());

    let mut timed = Trigger::new(TriggerDef::single(time_at_least("t", 1.0)));
    assert!(timed.activated(&scope, &snapshot).unwrap());
    assert!(!timed.activated(&scope, &snapshot).unwrap());
    timed.reset();
    assert!(timed.activated(&scope, &snapshot).unwrap());
}

#[test]
fn test_condition_error_propagates() {
    let mut trigger = Trigger::new(TriggerDef::single(ConditionDef::simulation_time(
        "t",
        Rule::GreaterThan,
        Scalar::parameter("$undeclared"),
    )));
    let scope = Scope::new();
    let states = ElementStates::new();
    let world = world(0.0, 10.0);

    assert!(trigger
        .evaluate(&scope, &Snapshot::new(1.0, &world, &states))
        .is_err());
}
