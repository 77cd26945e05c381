//! Action definitions.
//!
//! Private actions apply to the actors of their enclosing maneuver group, or to the
//! named entity of an init action.

use crate::geometry::{LaneletId, Position};
use crate::value::Scalar;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ActionDef {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: ActionKindDef,
}

impl ActionDef {
    pub fn new(name: impl Into<String>, kind: ActionKindDef) -> Self {
        ActionDef {
            name: name.into(),
            kind,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum ActionKindDef {
    Speed(SpeedActionDef),
    Teleport(TeleportActionDef),
    LaneChange(LaneChangeActionDef),
    SpeedProfile(SpeedProfileActionDef),
}

impl ActionKindDef {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ActionKindDef::Speed(_) => "SpeedAction",
            ActionKindDef::Teleport(_) => "TeleportAction",
            ActionKindDef::LaneChange(_) => "LaneChangeAction",
            ActionKindDef::SpeedProfile(_) => "SpeedProfileAction",
        }
    }
}

// Speed

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct SpeedActionDef {
    pub target: SpeedTarget,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dynamics: SpeedDynamics,
}

impl SpeedActionDef {
    pub fn absolute(value: impl Into<Scalar>, dynamics: SpeedDynamics) -> Self {
        SpeedActionDef {
            target: SpeedTarget::Absolute {
                value: value.into(),
            },
            dynamics,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum SpeedTarget {
    Absolute {
        value: Scalar,
    },
    /// Speed derived from another entity's current speed.
    Relative {
        entity_ref: String,
        value_type: RelativeValueType,
        value: Scalar,
        /// Keep tracking the reference entity instead of ending once reached.
        #[cfg_attr(feature = "serde", serde(default))]
        continuous: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum RelativeValueType {
    Delta,
    Factor,
}

impl RelativeValueType {
    /// Absolute speed relative to `reference_speed`.
    pub fn resolve(self, reference_speed: f64, value: f64) -> f64 {
        match self {
            RelativeValueType::Delta => reference_speed + value,
            RelativeValueType::Factor => reference_speed * value,
        }
    }
}

/// How the speed changes toward its target.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum SpeedTransition {
    /// Constant acceleration.
    #[default]
    Linear,
    /// Jump to the target speed.
    Step,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct SpeedDynamics {
    pub shape: SpeedTransition,
    /// Longitudinal acceleration magnitude for `Linear` transitions.
    pub rate: Option<Scalar>,
}

impl SpeedDynamics {
    pub fn step() -> Self {
        SpeedDynamics {
            shape: SpeedTransition::Step,
            rate: None,
        }
    }

    pub fn linear(rate: impl Into<Scalar>) -> Self {
        SpeedDynamics {
            shape: SpeedTransition::Linear,
            rate: Some(rate.into()),
        }
    }
}

// Teleport

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct TeleportActionDef {
    pub position: Position,
}

// Lane change

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct LaneChangeActionDef {
    pub target: LaneChangeTarget,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target_offset: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dynamics: LaneChangeDynamics,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum LaneChangeTarget {
    Absolute {
        lanelet_id: LaneletId,
    },
    /// `shift` lanes from the reference entity's lanelet, left positive.
    Relative {
        entity_ref: String,
        shift: i32,
    },
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum LaneChangeTrajectory {
    #[default]
    Cubic,
    Linear,
    Step,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct LaneChangeDynamics {
    pub trajectory: LaneChangeTrajectory,
    /// Lateral velocity constraint; the world picks its own when absent.
    pub lateral_velocity: Option<Scalar>,
}

// Speed profile

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct SpeedProfileActionDef {
    /// Entries are relative (delta) to this entity's speed when present.
    #[cfg_attr(feature = "serde", serde(default))]
    pub entity_ref: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub following_mode: FollowingMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dynamic_constraints: Option<DynamicConstraintsDef>,
    pub entries: Vec<SpeedProfileEntryDef>,
}

impl SpeedProfileActionDef {
    pub fn new(entries: Vec<SpeedProfileEntryDef>) -> Self {
        SpeedProfileActionDef {
            entity_ref: None,
            following_mode: FollowingMode::Position,
            dynamic_constraints: None,
            entries,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum FollowingMode {
    /// Follow the entry timing exactly.
    #[default]
    Position,
    /// Reach entry speeds at the constrained rate, ignoring entry times.
    Follow,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct SpeedProfileEntryDef {
    pub speed: Scalar,
    /// Seconds allotted to reach `speed`, measured from the entry becoming current.
    #[cfg_attr(feature = "serde", serde(default))]
    pub time: Option<Scalar>,
}

impl SpeedProfileEntryDef {
    pub fn new(speed: impl Into<Scalar>, time: Option<f64>) -> Self {
        SpeedProfileEntryDef {
            speed: speed.into(),
            time: time.map(Scalar::Literal),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct DynamicConstraintsDef {
    pub max_acceleration: Scalar,
    pub max_deceleration: Scalar,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_speed: Option<Scalar>,
}
