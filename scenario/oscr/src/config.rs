//! Run configuration for the `osc` command line.

use thiserror::Error;

/// How `osc run` drives a scenario.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Simulated seconds per tick.
    pub step: f64,
    /// Simulated seconds after which a still-running scenario fails.
    pub timeout: f64,
    /// Log storyboard transitions even without `RUST_LOG`.
    pub verbose: bool,
    /// Print the storyboard state tree when the run ends.
    pub dump: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            step: 0.05,
            timeout: 60.0,
            verbose: false,
            dump: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {option}: expected a positive number of seconds")]
    InvalidSeconds { option: &'static str, value: String },

    #[error("unknown option `{0}`")]
    UnknownOption(String),
}

impl RunConfig {
    /// Apply one command line argument. Returns `Ok(false)` for positional
    /// arguments, which are left to the caller.
    pub fn apply_flag(&mut self, arg: &str) -> Result<bool, ConfigError> {
        if let Some(value) = arg.strip_prefix("--step=") {
            self.step = seconds("--step", value)?;
        } else if let Some(value) = arg.strip_prefix("--timeout=") {
            self.timeout = seconds("--timeout", value)?;
        } else if arg == "--verbose" || arg == "-v" {
            self.verbose = true;
        } else if arg == "--dump" {
            self.dump = true;
        } else if arg.starts_with('-') {
            return Err(ConfigError::UnknownOption(arg.to_string()));
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}

/// Parse run options, flags and positionals in any order.
pub fn parse_run_options(args: &[String]) -> Result<(RunConfig, Vec<String>), ConfigError> {
    let mut config = RunConfig::default();
    let mut positional = Vec::new();
    for arg in args {
        if !config.apply_flag(arg)? {
            positional.push(arg.clone());
        }
    }
    Ok((config, positional))
}

fn seconds(option: &'static str, value: &str) -> Result<f64, ConfigError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|seconds| seconds.is_finite() && *seconds > 0.0)
        .ok_or_else(|| ConfigError::InvalidSeconds {
            option,
            value: value.to_string(),
        })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
