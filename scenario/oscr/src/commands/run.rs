//! The `run` command: load a scenario and tick it to a verdict on the reference
//! simulator.

use osc_eval::{dump_storyboard, Interpreter, ScenarioResult, Verdict};
use tracing::info;

use super::{exit_code, load, EXIT_ERROR};
use crate::config::RunConfig;
use crate::load::ScenarioFile;

/// How a run ended.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    pub verdict: Verdict,
    /// Simulated seconds when the verdict was reached.
    pub time: f64,
    pub ticks: u64,
    /// Storyboard state tree at the end, when requested.
    pub dump: Option<String>,
}

/// Tick `file` until its verdict is terminal or `config.timeout` simulated
/// seconds have passed. A timeout is a failure.
///
/// Only load errors are returned as `Err`; runtime errors are `Verdict::Error`.
pub fn simulate(file: &ScenarioFile, config: &RunConfig) -> ScenarioResult<RunReport> {
    let mut interpreter = Interpreter::new(&file.scenario, file.world())?;
    info!(
        entities = file.scenario.entities.len(),
        step = config.step,
        "scenario loaded"
    );

    let mut verdict = Verdict::Running;
    while !verdict.is_terminal() {
        if interpreter.time() + config.step > config.timeout + config.step * 0.5 {
            verdict = Verdict::Failure(format!("timeout after {}s", config.timeout));
            break;
        }
        verdict = interpreter.tick(config.step);
    }

    Ok(RunReport {
        verdict,
        time: interpreter.time(),
        ticks: interpreter.ticks(),
        dump: config.dump.then(|| dump_storyboard(interpreter.storyboard())),
    })
}

/// Run a scenario file and print its verdict.
pub fn run_file(path: &str, config: &RunConfig) -> i32 {
    let Some(file) = load(path) else {
        return EXIT_ERROR;
    };
    match simulate(&file, config) {
        Ok(report) => {
            if let Some(dump) = &report.dump {
                print!("{dump}");
            }
            println!(
                "{path}: {} at t={:.3}s after {} ticks",
                report.verdict, report.time, report.ticks
            );
            exit_code(&report.verdict)
        }
        Err(error) => {
            eprintln!("error: {path}: {error}");
            EXIT_ERROR
        }
    }
}
