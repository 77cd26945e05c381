use super::*;

#[test]
fn test_pick_longitudinal_shorter_backward_wins() {
    // Forward 30 m around a loop, backward 5 m: the entity is actually behind.
    assert_eq!(pick_longitudinal(Some(30.0), Some(5.0)), Some(-5.0));
}

#[test]
fn test_pick_longitudinal_forward_wins_ties_and_shorter() {
    assert_eq!(pick_longitudinal(Some(4.0), Some(9.0)), Some(4.0));
    assert_eq!(pick_longitudinal(Some(5.0), Some(5.0)), Some(5.0));
}

#[test]
fn test_pick_longitudinal_single_candidates() {
    assert_eq!(pick_longitudinal(Some(3.0), None), Some(3.0));
    assert_eq!(pick_longitudinal(None, Some(3.0)), Some(-3.0));
    assert_eq!(pick_longitudinal(None, None), None);
}

#[test]
fn test_nearest_by_magnitude_keeps_sign() {
    assert_eq!(nearest_by_magnitude([7.0, -2.0, 3.0]), Some(-2.0));
    assert_eq!(nearest_by_magnitude(Vec::new()), None);
}

#[test]
fn test_bounding_box_longitudinal_gap() {
    let car = BoundingBox::new(4.0, 2.0, 1.5);
    // Centers 10 m apart, each box extends 2 m toward the other.
    assert_eq!(bounding_box_longitudinal(10.0, &car, &car), 6.0);
    assert_eq!(bounding_box_longitudinal(-10.0, &car, &car), -6.0);
    assert_eq!(bounding_box_longitudinal(0.0, &car, &car), 0.0);
}

#[test]
fn test_bounding_box_lateral_gap() {
    let car = BoundingBox::new(4.0, 2.0, 1.5);
    assert_eq!(bounding_box_lateral(3.5, &car, &car), 1.5);
    assert_eq!(bounding_box_lateral(-3.5, &car, &car), -1.5);
}

#[test]
fn test_footprint_corners_rotate_with_yaw() {
    let bbox = BoundingBox::new(4.0, 2.0, 1.5);
    let corners = footprint(&Pose::new(0.0, 0.0, std::f64::consts::FRAC_PI_2), &bbox);
    // Front-left corner of a car facing +y sits at (-1, 2).
    assert!((corners[0].x + 1.0).abs() < 1e-9);
    assert!((corners[0].y - 2.0).abs() < 1e-9);
}

#[test]
fn test_footprints_overlap_and_distance() {
    let bbox = BoundingBox::new(4.0, 2.0, 1.5);
    let a = footprint(&Pose::new(0.0, 0.0, 0.0), &bbox);
    let b = footprint(&Pose::new(3.0, 0.5, 0.0), &bbox);
    let c = footprint(&Pose::new(10.0, 0.0, 0.0), &bbox);

    assert!(footprints_overlap(&a, &b));
    assert_eq!(footprint_distance(&a, &b), 0.0);
    assert!(!footprints_overlap(&a, &c));
    assert!((footprint_distance(&a, &c) - 6.0).abs() < 1e-9);
}
