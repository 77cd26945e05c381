//! Geometry primitives shared by scenario definitions and the world boundary.

/// Identifier of a lanelet in the road map.
pub type LaneletId = u64;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y, z: 0.0 }
    }

    /// Planar distance, ignoring `z`.
    pub fn distance_2d(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Planar pose: position plus heading (radians, counter-clockwise from +x).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct Pose {
    pub position: Point,
    pub yaw: f64,
}

impl Pose {
    pub const fn new(x: f64, y: f64, yaw: f64) -> Self {
        Pose {
            position: Point::new(x, y),
            yaw,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

/// Entity footprint; `center` is the offset of the box center from the entity origin.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct BoundingBox {
    #[cfg_attr(feature = "serde", serde(default))]
    pub center: Point,
    pub dimensions: Dimensions,
}

impl BoundingBox {
    /// Box of the given size centered on the entity origin.
    pub const fn new(length: f64, width: f64, height: f64) -> Self {
        BoundingBox {
            center: Point::new(0.0, 0.0),
            dimensions: Dimensions {
                length,
                width,
                height,
            },
        }
    }
}

impl Default for BoundingBox {
    /// A passenger car.
    fn default() -> Self {
        BoundingBox::new(4.5, 1.8, 1.5)
    }
}

/// Position along a lanelet: arc length `s` and signed lateral `offset` (left positive).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct LaneletPose {
    pub lanelet_id: LaneletId,
    pub s: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub offset: f64,
}

impl LaneletPose {
    pub const fn new(lanelet_id: LaneletId, s: f64, offset: f64) -> Self {
        LaneletPose {
            lanelet_id,
            s,
            offset,
        }
    }
}

/// A position as written in a scenario document.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum Position {
    World(Pose),
    Lanelet(LaneletPose),
    /// Offset in the world frame from another entity's current position.
    RelativeObject {
        entity_ref: String,
        dx: f64,
        dy: f64,
    },
}
