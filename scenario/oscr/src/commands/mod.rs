//! Command handlers for the `osc` CLI.
//!
//! Each handler prints its own report and returns the process exit code;
//! `main` only dispatches.

mod check;
mod dump;
mod run;

use std::path::Path;

use osc_eval::Verdict;

use crate::load::{read_scenario, ScenarioFile};

pub use check::check_file;
pub use dump::dump_file;
pub use run::{run_file, simulate, RunReport};

/// The run reached its goal.
pub const EXIT_SUCCESS: i32 = 0;
/// A failure criterion fired or the run timed out.
pub const EXIT_FAILURE: i32 = 1;
/// The scenario could not be loaded or the run aborted.
pub const EXIT_ERROR: i32 = 2;

pub fn exit_code(verdict: &Verdict) -> i32 {
    match verdict {
        Verdict::Success => EXIT_SUCCESS,
        Verdict::Failure(_) => EXIT_FAILURE,
        Verdict::Running | Verdict::Error(_) => EXIT_ERROR,
    }
}

/// Read a scenario file, reporting failures on stderr.
fn load(path: &str) -> Option<ScenarioFile> {
    match read_scenario(Path::new(path)) {
        Ok(file) => Some(file),
        Err(error) => {
            eprintln!("error: {error}");
            None
        }
    }
}
