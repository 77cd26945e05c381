//! Pure distance helpers.
//!
//! Lane-relative distances come from the world; these functions combine them with
//! bounding boxes and pick between candidates. Footprint helpers work on the planar
//! rectangle an entity occupies.

use osc_ir::{BoundingBox, Point, Pose};

/// Choose between the forward (`from`→`to`) and backward (`to`→`from`) lane distances.
///
/// When both exist the shorter one wins, and a backward result is negated. A tie
/// keeps the forward distance.
pub fn pick_longitudinal(forward: Option<f64>, backward: Option<f64>) -> Option<f64> {
    match (forward, backward) {
        (Some(forward), Some(backward)) => Some(if forward > backward {
            -backward
        } else {
            forward
        }),
        (Some(forward), None) => Some(forward),
        (None, Some(backward)) => Some(-backward),
        (None, None) => None,
    }
}

/// The candidate with the smallest magnitude, sign preserved.
pub fn nearest_by_magnitude(distances: impl IntoIterator<Item = f64>) -> Option<f64> {
    distances
        .into_iter()
        .min_by(|a, b| a.abs().total_cmp(&b.abs()))
}

/// Signed distances from the entity origin to each edge of its bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeDistances {
    pub front: f64,
    pub rear: f64,
    pub left: f64,
    pub right: f64,
}

pub fn distances_from_center_to_edge(bbox: &BoundingBox) -> EdgeDistances {
    let half_length = bbox.dimensions.length * 0.5;
    let half_width = bbox.dimensions.width * 0.5;
    EdgeDistances {
        front: bbox.center.x + half_length,
        rear: bbox.center.x - half_length,
        left: bbox.center.y + half_width,
        right: bbox.center.y - half_width,
    }
}

/// Shrink a longitudinal center distance to the gap between the two boxes.
pub fn bounding_box_longitudinal(distance: f64, from: &BoundingBox, to: &BoundingBox) -> f64 {
    let from_edges = distances_from_center_to_edge(from);
    let to_edges = distances_from_center_to_edge(to);
    let adjustment = if distance > 0.0 {
        -from_edges.front.abs() - to_edges.rear.abs()
    } else if distance < 0.0 {
        from_edges.rear.abs() + to_edges.front.abs()
    } else {
        0.0
    };
    distance + adjustment
}

/// Shrink a lateral center distance to the gap between the two boxes.
pub fn bounding_box_lateral(distance: f64, from: &BoundingBox, to: &BoundingBox) -> f64 {
    let from_edges = distances_from_center_to_edge(from);
    let to_edges = distances_from_center_to_edge(to);
    let adjustment = if distance > 0.0 {
        -from_edges.right.abs() - to_edges.left.abs()
    } else if distance < 0.0 {
        from_edges.left.abs() + to_edges.right.abs()
    } else {
        0.0
    };
    distance + adjustment
}

/// Corners of the footprint in world coordinates, counter-clockwise from front-left.
pub fn footprint(pose: &Pose, bbox: &BoundingBox) -> [Point; 4] {
    let (sin, cos) = pose.yaw.sin_cos();
    let rotate = |x: f64, y: f64| {
        Point::new(
            pose.position.x + x * cos - y * sin,
            pose.position.y + x * sin + y * cos,
        )
    };
    let edges = distances_from_center_to_edge(bbox);
    [
        rotate(edges.front, edges.left),
        rotate(edges.rear, edges.left),
        rotate(edges.rear, edges.right),
        rotate(edges.front, edges.right),
    ]
}

fn project(polygon: &[Point; 4], axis: (f64, f64)) -> (f64, f64) {
    polygon
        .iter()
        .map(|p| p.x * axis.0 + p.y * axis.1)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}

/// Separating-axis overlap test for two footprints. Touching edges count as overlap.
pub fn footprints_overlap(a: &[Point; 4], b: &[Point; 4]) -> bool {
    let axes = a
        .iter()
        .zip(a.iter().cycle().skip(1))
        .chain(b.iter().zip(b.iter().cycle().skip(1)))
        .map(|(p, q)| (-(q.y - p.y), q.x - p.x));
    for axis in axes {
        let (a_lo, a_hi) = project(a, axis);
        let (b_lo, b_hi) = project(b, axis);
        if a_hi < b_lo || b_hi < a_lo {
            return false;
        }
    }
    true
}

fn point_segment_distance(p: &Point, a: &Point, b: &Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return p.distance_2d(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    p.distance_2d(&Point::new(a.x + t * dx, a.y + t * dy))
}

fn vertex_to_edges(vertices: &[Point; 4], polygon: &[Point; 4]) -> f64 {
    vertices
        .iter()
        .flat_map(|v| {
            polygon
                .iter()
                .zip(polygon.iter().cycle().skip(1))
                .map(move |(a, b)| point_segment_distance(v, a, b))
        })
        .fold(f64::INFINITY, f64::min)
}

/// Gap between two footprints, zero when they overlap.
pub fn footprint_distance(a: &[Point; 4], b: &[Point; 4]) -> f64 {
    if footprints_overlap(a, b) {
        return 0.0;
    }
    vertex_to_edges(a, b).min(vertex_to_edges(b, a))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
