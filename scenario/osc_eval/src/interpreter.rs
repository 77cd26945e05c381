//! The interpreter driver: owns a loaded storyboard and a simulation, and
//! steps both by simulated time.

use std::fmt;

use osc_ir::{ElementState, ScenarioDef};
use osc_world::Simulation;
use tracing::{debug, debug_span, warn};

use crate::errors::ScenarioResult;
use crate::states::ElementStates;
use crate::storyboard::{build, Storyboard, TickContext};

/// How the run stands after a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Running,
    Success,
    Failure(String),
    Error(String),
}

impl Verdict {
    /// Whether the run is over. Terminal verdicts never change.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Verdict::Running)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Running => f.write_str("running"),
            Verdict::Success => f.write_str("success"),
            Verdict::Failure(reason) => write!(f, "failure: {reason}"),
            Verdict::Error(reason) => write!(f, "error: {reason}"),
        }
    }
}

pub struct Interpreter<S> {
    storyboard: Storyboard,
    simulation: S,
    states: ElementStates,
    time: f64,
    tick: u64,
    verdict: Verdict,
}

impl<S: Simulation> Interpreter<S> {
    /// Load and validate `scenario` against `simulation`.
    ///
    /// Every load-time problem is reported here; nothing is ticked.
    pub fn new(scenario: &ScenarioDef, simulation: S) -> ScenarioResult<Self> {
        let (storyboard, states) = build(scenario)?;
        Ok(Interpreter {
            storyboard,
            simulation,
            states,
            time: 0.0,
            tick: 0,
            verdict: Verdict::Running,
        })
    }

    /// Advance by `dt` simulated seconds and return the verdict.
    pub fn tick(&mut self, dt: f64) -> Verdict {
        if self.verdict.is_terminal() {
            return self.verdict.clone();
        }
        if !dt.is_finite() || dt <= 0.0 {
            return self.conclude(Verdict::Error(format!(
                "time step must be a positive number of seconds, got {dt}"
            )));
        }

        self.tick += 1;
        self.time += dt;
        let span = debug_span!("tick", tick = self.tick, time = self.time);
        let _guard = span.enter();

        self.simulation.advance(dt);
        self.storyboard.settle(&mut self.states);
        let mut ctx = TickContext {
            time: self.time,
            simulation: &mut self.simulation,
            states: &mut self.states,
        };
        let verdict = match self.storyboard.step(&mut ctx) {
            Ok(verdict) => verdict,
            Err(error) => Verdict::Error(error.to_string()),
        };
        self.conclude(verdict)
    }

    fn conclude(&mut self, verdict: Verdict) -> Verdict {
        match &verdict {
            Verdict::Running => {}
            Verdict::Error(reason) => warn!(time = self.time, %reason, "run aborted"),
            terminal => debug!(time = self.time, verdict = %terminal, "run finished"),
        }
        self.verdict = verdict.clone();
        verdict
    }

    /// Simulated seconds since the run started.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of ticks taken so far.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    pub fn element_state(&self, name: &str) -> Option<ElementState> {
        self.states.get(name)
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut S {
        &mut self.simulation
    }

    pub fn storyboard(&self) -> &Storyboard {
        &self.storyboard
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
