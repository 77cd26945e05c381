//! OSC Runner - Command line front end for the storyboard interpreter.
//!
//! Reads JSON scenario files, builds the reference [`osc_world::KinematicWorld`]
//! they describe, and drives [`osc_eval::Interpreter`] to a verdict.

pub mod commands;
pub mod config;
pub mod load;
mod tracing_setup;

pub use config::{parse_run_options, ConfigError, RunConfig};
pub use load::{read_scenario, LoadError, RoadConfig, ScenarioFile};
pub use tracing_setup::init_tracing;
