use super::*;
use pretty_assertions::assert_eq;

fn world_with(entities: &[(&str, f64, f64, f64)]) -> KinematicWorld {
    let mut world = KinematicWorld::new(StraightRoad::default());
    for (name, x, y, speed) in entities {
        world.spawn(*name, BoundingBox::new(4.0, 2.0, 1.5), Pose::new(*x, *y, 0.0), *speed);
    }
    world
}

#[test]
fn test_linear_speed_change_respects_rate() {
    let mut world = world_with(&[("ego", 0.0, 0.0, 0.0)]);
    world
        .apply("ego", Instruction::TargetSpeed(SpeedRequest::linear(10.0, 2.0)))
        .unwrap();

    world.advance(1.0);
    let ego = world.entity("ego").unwrap();
    assert_eq!(ego.speed, 2.0);
    assert_eq!(ego.acceleration, 2.0);

    for _ in 0..10 {
        world.advance(1.0);
    }
    assert_eq!(world.entity("ego").unwrap().speed, 10.0);
}

#[test]
fn test_step_speed_takes_effect_on_apply() {
    let mut world = world_with(&[("ego", 0.0, 0.0, 3.0)]);
    world
        .apply("ego", Instruction::TargetSpeed(SpeedRequest::step(8.0)))
        .unwrap();
    assert_eq!(world.entity("ego").unwrap().speed, 8.0);
}

#[test]
fn test_constraints_clamp_rate_and_speed() {
    let mut world = world_with(&[("ego", 0.0, 0.0, 0.0)]);
    let constraints = DynamicConstraints {
        max_acceleration: 1.0,
        max_deceleration: 1.0,
        max_speed: Some(1.5),
    };
    world
        .apply("ego", Instruction::DynamicConstraints(constraints))
        .unwrap();
    world
        .apply("ego", Instruction::TargetSpeed(SpeedRequest::linear(10.0, 5.0)))
        .unwrap();

    world.advance(1.0);
    assert_eq!(world.entity("ego").unwrap().speed, 1.0);
    world.advance(1.0);
    assert_eq!(world.entity("ego").unwrap().speed, 1.5);
}

#[test]
fn test_unknown_entity_is_rejected() {
    let mut world = world_with(&[]);
    let result = world.apply("ghost", Instruction::Teleport(Pose::default()));
    assert_eq!(result, Err(ApplyError::UnknownEntity("ghost".to_string())));
    assert!(world.applied().is_empty());
}

#[test]
fn test_apply_is_logged_and_idempotent() {
    let mut world = world_with(&[("ego", 0.0, 0.0, 0.0)]);
    let teleport = Instruction::Teleport(Pose::new(20.0, 3.5, 0.0));
    world.apply("ego", teleport).unwrap();
    world.apply("ego", teleport).unwrap();

    let ego = world.entity("ego").unwrap();
    assert_eq!(ego.pose, Pose::new(20.0, 3.5, 0.0));
    assert_eq!(ego.lanelet_pose, Some(LaneletPose::new(101, 20.0, 0.0)));
    assert_eq!(world.applied().len(), 2);

    world.clear_log();
    assert!(world.applied().is_empty());
}

#[test]
fn test_lane_change_moves_laterally() {
    let mut world = world_with(&[("ego", 0.0, 0.0, 0.0)]);
    let request = LaneChangeRequest {
        target: 101,
        offset: 0.0,
        trajectory: LaneChangeTrajectory::Linear,
        lateral_velocity: Some(1.0),
    };
    world.apply("ego", Instruction::LaneChange(request)).unwrap();

    world.advance(2.0);
    assert_eq!(world.entity("ego").unwrap().pose.position.y, 2.0);
    world.advance(2.0);
    assert_eq!(world.entity("ego").unwrap().pose.position.y, 3.5);
}

#[test]
fn test_lane_change_off_road_is_rejected() {
    let mut world = world_with(&[("ego", 0.0, 0.0, 0.0)]);
    let request = LaneChangeRequest {
        target: 999,
        offset: 0.0,
        trajectory: LaneChangeTrajectory::Step,
        lateral_velocity: None,
    };
    let result = world.apply("ego", Instruction::LaneChange(request));
    assert!(matches!(result, Err(ApplyError::Rejected { .. })));
}

#[test]
fn test_stand_still_accumulates_until_moving() {
    let mut world = world_with(&[("ego", 0.0, 0.0, 0.0)]);
    world.advance(0.5);
    world.advance(0.5);
    assert_eq!(world.entity("ego").unwrap().stand_still_duration, 1.0);

    world.set_speed("ego", 4.0).unwrap();
    world.advance(0.5);
    let ego = world.entity("ego").unwrap();
    assert_eq!(ego.stand_still_duration, 0.0);
    assert_eq!(ego.pose.position.x, 2.0);
}

#[test]
fn test_longitudinal_distance_sign_and_lanes() {
    let world = world_with(&[("ego", 10.0, 0.0, 0.0), ("lead", 25.0, 0.0, 0.0), ("side", 30.0, 3.5, 0.0)]);

    let same_lane = DistanceOptions::default();
    assert_eq!(world.longitudinal_distance("ego", "lead", same_lane), Some(15.0));
    assert_eq!(world.longitudinal_distance("lead", "ego", same_lane), Some(-15.0));
    assert_eq!(world.longitudinal_distance("ego", "side", same_lane), None);

    let any_lane = DistanceOptions {
        allow_lane_change: true,
        ..DistanceOptions::default()
    };
    assert_eq!(world.longitudinal_distance("ego", "side", any_lane), Some(20.0));
    assert_eq!(world.longitudinal_distance("ego", "ghost", any_lane), None);
}

#[test]
fn test_lateral_distance_and_lane_bounds() {
    let world = world_with(&[("ego", 0.0, 0.0, 0.0), ("side", 0.0, 3.5, 0.0)]);
    assert_eq!(world.lateral_distance("ego", "side", true), Some(3.5));
    assert_eq!(world.lateral_distance("ego", "side", false), None);

    let bounds = world.lane_bound_distances("ego").unwrap();
    assert!((bounds.left - 0.75).abs() < 1e-9);
    assert!((bounds.right - 0.75).abs() < 1e-9);
    assert!((bounds.nearest() - 0.75).abs() < 1e-9);
}

#[test]
fn test_speed_limit_only_on_road() {
    let world = world_with(&[]);
    assert!(world.speed_limit(100).is_some());
    assert_eq!(world.speed_limit(42), None);
}
