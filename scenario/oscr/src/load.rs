//! Scenario files.
//!
//! A scenario file is a JSON document holding the scenario definition and,
//! optionally, the road the reference simulator should build:
//!
//! ```json
//! { "road": { "lanes": 2 }, "scenario": { "entities": [...], "storyboard": {...} } }
//! ```

use std::path::{Path, PathBuf};

use osc_ir::{LaneletId, Pose, ScenarioDef};
use osc_world::{KinematicWorld, StraightRoad};
use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RoadConfig {
    pub lanes: u32,
    pub lane_width: f64,
    pub first_lanelet_id: LaneletId,
    /// Meters per second.
    pub speed_limit: f64,
}

impl Default for RoadConfig {
    fn default() -> Self {
        let road = StraightRoad::default();
        RoadConfig {
            lanes: road.lanes,
            lane_width: road.lane_width,
            first_lanelet_id: road.first_lanelet_id,
            speed_limit: road.speed_limit,
        }
    }
}

impl From<&RoadConfig> for StraightRoad {
    fn from(config: &RoadConfig) -> Self {
        StraightRoad {
            lanes: config.lanes,
            lane_width: config.lane_width,
            first_lanelet_id: config.first_lanelet_id,
            speed_limit: config.speed_limit,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioFile {
    #[serde(default)]
    pub road: RoadConfig,
    pub scenario: ScenarioDef,
}

impl ScenarioFile {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// A fresh reference world with every declared entity at the origin and at
    /// rest. Init actions place them.
    pub fn world(&self) -> KinematicWorld {
        let mut world = KinematicWorld::new(StraightRoad::from(&self.road));
        for entity in &self.scenario.entities {
            world.spawn(entity.name.clone(), entity.bounding_box, Pose::default(), 0.0);
        }
        world
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn read_scenario(path: &Path) -> Result<ScenarioFile, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ScenarioFile::parse(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
