use super::*;
use osc_ir::{
    BoundingBox, ConditionDef, ElementState, LaneletPose, ParameterType, Pose, Position, Rule,
    Scalar,
};
use osc_world::{KinematicWorld, SpeedRequest, StraightRoad};
use osc_world::{ActionApplication, Instruction, Simulation};

use crate::errors::ScenarioError;

fn world() -> KinematicWorld {
    let mut world = KinematicWorld::new(StraightRoad::default());
    world.spawn("ego", BoundingBox::new(4.0, 2.0, 1.5), Pose::new(0.0, 0.0, 0.0), 10.0);
    world.spawn("npc", BoundingBox::new(4.0, 2.0, 1.5), Pose::new(20.0, 0.0, 0.0), 5.0);
    world.spawn("side", BoundingBox::new(4.0, 2.0, 1.5), Pose::new(3.0, 3.5, 0.0), 0.0);
    world.spawn("wreck", BoundingBox::new(4.0, 2.0, 1.5), Pose::new(1.0, 0.5, 0.3), 0.0);
    world
}

fn check(condition: &ConditionDef, world: &KinematicWorld) -> ScenarioResult<bool> {
    let states = ElementStates::new();
    evaluate(condition, &Scope::new(), &Snapshot::new(1.0, world, &states))
}

fn distance(
    distance_type: DistanceType,
    freespace: bool,
    rule: Rule,
    value: f64,
) -> ConditionDef {
    ConditionDef::by_entity(
        "distance",
        &["ego"],
        EntityCondition::RelativeDistance {
            entity_ref: "npc".to_string(),
            distance_type,
            freespace,
            allow_lane_change: false,
            rule,
            value: Scalar::Literal(value),
        },
    )
}

#[test]
fn test_simulation_time_with_parameter() {
    let mut scope = Scope::new();
    scope.declare("deadline", ParameterType::Double, "0.5").unwrap();
    let condition =
        ConditionDef::simulation_time("late", Rule::GreaterThan, Scalar::parameter("$deadline"));
    let world = world();
    let states = ElementStates::new();

    assert!(evaluate(&condition, &scope, &Snapshot::new(1.0, &world, &states)).unwrap());
    assert!(!evaluate(&condition, &scope, &Snapshot::new(0.2, &world, &states)).unwrap());
}

#[test]
fn test_evaluation_is_deterministic() {
    let world = world();
    let condition = distance(DistanceType::Longitudinal, false, Rule::LessThan, 25.0);
    let first = check(&condition, &world).unwrap();
    for _ in 0..3 {
        assert_eq!(check(&condition, &world).unwrap(), first);
    }
}

#[test]
fn test_relative_distance_kinds() {
    let world = world();
    assert!(check(&distance(DistanceType::Cartesian, false, Rule::EqualTo, 20.0), &world).unwrap());
    assert!(check(&distance(DistanceType::Cartesian, true, Rule::EqualTo, 16.0), &world).unwrap());
    assert!(check(&distance(DistanceType::Longitudinal, false, Rule::EqualTo, 20.0), &world).unwrap());
    assert!(check(&distance(DistanceType::Longitudinal, true, Rule::EqualTo, 16.0), &world).unwrap());
    assert!(check(&distance(DistanceType::Lateral, false, Rule::EqualTo, 0.0), &world).unwrap());
}

#[test]
fn test_unavailable_distance_is_false() {
    let world = world();
    let condition = ConditionDef::by_entity(
        "lane",
        &["ego"],
        EntityCondition::RelativeDistance {
            entity_ref: "side".to_string(),
            distance_type: DistanceType::Longitudinal,
            freespace: false,
            allow_lane_change: false,
            rule: Rule::GreaterOrEqual,
            value: Scalar::Literal(0.0),
        },
    );
    assert!(!check(&condition, &world).unwrap());
}

#[test]
fn test_speed_acceleration_and_stand_still() {
    let mut world = world();
    let fast = ConditionDef::by_entity(
        "fast",
        &["ego"],
        EntityCondition::Speed {
            rule: Rule::GreaterThan,
            value: Scalar::Literal(9.0),
        },
    );
    assert!(check(&fast, &world).unwrap());

    world
        .apply("npc", Instruction::TargetSpeed(SpeedRequest::linear(7.0, 2.0)))
        .unwrap();
    world.advance(0.5);
    let accelerating = ConditionDef::by_entity(
        "accelerating",
        &["npc"],
        EntityCondition::Acceleration {
            rule: Rule::EqualTo,
            value: Scalar::Literal(2.0),
        },
    );
    assert!(check(&accelerating, &world).unwrap());

    let parked = ConditionDef::by_entity(
        "parked",
        &["side"],
        EntityCondition::StandStill {
            rule: Rule::GreaterOrEqual,
            duration: Scalar::Literal(0.5),
        },
    );
    assert!(check(&parked, &world).unwrap());
}

#[test]
fn test_reach_position() {
    let world = world();
    let reached = |position: Position| {
        ConditionDef::by_entity(
            "reach",
            &["npc"],
            EntityCondition::ReachPosition {
                position,
                tolerance: Scalar::Literal(0.5),
            },
        )
    };
    assert!(check(&reached(Position::Lanelet(LaneletPose::new(100, 20.2, 0.0))), &world).unwrap());
    assert!(!check(&reached(Position::World(Pose::new(0.0, 0.0, 0.0))), &world).unwrap());
    assert!(check(
        &reached(Position::RelativeObject {
            entity_ref: "ego".to_string(),
            dx: 20.0,
            dy: 0.0
        }),
        &world
    )
    .unwrap());
    assert!(!check(&reached(Position::Lanelet(LaneletPose::new(7, 0.0, 0.0))), &world).unwrap());
}

#[test]
fn test_collision() {
    let world = world();
    let colliding = |entity_ref: &str| {
        ConditionDef::by_entity(
            "collision",
            &["ego"],
            EntityCondition::Collision {
                entity_ref: entity_ref.to_string(),
            },
        )
    };
    assert!(check(&colliding("wreck"), &world).unwrap());
    assert!(!check(&colliding("side"), &world).unwrap());
    assert!(!check(&colliding("npc"), &world).unwrap());
}

#[test]
fn test_triggering_rule_all_and_any() {
    let world = world();
    let moving = |rule: TriggeringRule| {
        let mut condition = ConditionDef::by_entity(
            "moving",
            &["ego", "npc"],
            EntityCondition::Speed {
                rule: Rule::GreaterThan,
                value: Scalar::Literal(7.0),
            },
        );
        if let ConditionKind::ByEntity(by_entity) = &mut condition.kind {
            by_entity.triggering_entities.rule = rule;
        }
        condition
    };
    assert!(check(&moving(TriggeringRule::Any), &world).unwrap());
    assert!(!check(&moving(TriggeringRule::All), &world).unwrap());
}

#[test]
fn test_missing_entity_is_an_error() {
    let world = world();
    let condition = ConditionDef::by_entity(
        "ghost",
        &["ghost"],
        EntityCondition::Speed {
            rule: Rule::GreaterThan,
            value: Scalar::Literal(0.0),
        },
    );
    assert_eq!(
        check(&condition, &world),
        Err(ScenarioError::UnknownEntity("ghost".to_string()))
    );
}

#[test]
fn test_parameter_condition() {
    let mut scope = Scope::new();
    scope.declare("count", ParameterType::Integer, "3").unwrap();
    scope.declare("mode", ParameterType::String, "eco").unwrap();
    let world = world();
    let states = ElementStates::new();
    let snapshot = Snapshot::new(0.0, &world, &states);
    let condition = |parameter_ref: &str, rule: Rule, value: &str| {
        ConditionDef::new(
            "p",
            ConditionKind::Parameter(ParameterCondition {
                parameter_ref: parameter_ref.to_string(),
                rule,
                value: value.to_string(),
            }),
        )
    };

    assert!(evaluate(&condition("count", Rule::GreaterThan, "2"), &scope, &snapshot).unwrap());
    assert!(evaluate(&condition("mode", Rule::EqualTo, "eco"), &scope, &snapshot).unwrap());
    assert!(evaluate(&condition("mode", Rule::NotEqualTo, "sport"), &scope, &snapshot).unwrap());
    assert!(matches!(
        evaluate(&condition("mode", Rule::LessThan, "zzz"), &scope, &snapshot),
        Err(ScenarioError::ParameterType { .. })
    ));
    assert!(matches!(
        evaluate(&condition("count", Rule::EqualTo, "three"), &scope, &snapshot),
        Err(ScenarioError::ParameterType { .. })
    ));
}

#[test]
fn test_element_state_condition() {
    let world = world();
    let mut states = ElementStates::new();
    states.register("act");
    let condition = ConditionDef::element_state("running", "act", ElementState::RunningState);

    assert!(!evaluate(&condition, &Scope::new(), &Snapshot::new(0.0, &world, &states)).unwrap());
    states.set("act", ElementState::RunningState);
    assert!(evaluate(&condition, &Scope::new(), &Snapshot::new(0.0, &world, &states)).unwrap());

    let unknown = ConditionDef::element_state("x", "nope", ElementState::RunningState);
    assert!(matches!(
        evaluate(&unknown, &Scope::new(), &Snapshot::new(0.0, &world, &states)),
        Err(ScenarioError::Configuration(_))
    ));
}
