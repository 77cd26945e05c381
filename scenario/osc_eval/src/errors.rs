//! Interpreter errors and their constructors.
//!
//! Load-time kinds abort `Interpreter::new`; runtime kinds end a run with an
//! `Error` verdict carrying the error's message.

use osc_world::ApplyError;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScenarioError {
    /// Duplicate or malformed parameter declaration.
    #[error("cannot declare parameter `{name}`: {reason}")]
    Declaration { name: String, reason: String },

    #[error("parameter `{0}` is not declared")]
    UndeclaredParameter(String),

    /// A parameter used where its declared type does not fit.
    #[error("parameter `{name}`: {reason}")]
    ParameterType { name: String, reason: String },

    #[error("entity `{0}` does not exist")]
    UnknownEntity(String),

    #[error("`{element}` cannot {operation} in state {state}")]
    InvalidState {
        element: String,
        operation: &'static str,
        state: &'static str,
    },

    /// Structurally inconsistent storyboard.
    #[error("{0}")]
    Configuration(String),

    /// The world refused an instruction.
    #[error("{0}")]
    Application(String),
}

impl ScenarioError {
    /// Whether this kind is only ever raised before the first tick.
    pub fn is_load_time(&self) -> bool {
        matches!(
            self,
            ScenarioError::Declaration { .. }
                | ScenarioError::UndeclaredParameter(_)
                | ScenarioError::ParameterType { .. }
                | ScenarioError::Configuration(_)
        )
    }
}

impl From<ApplyError> for ScenarioError {
    fn from(error: ApplyError) -> Self {
        match error {
            ApplyError::UnknownEntity(name) => ScenarioError::UnknownEntity(name),
            rejected @ ApplyError::Rejected { .. } => ScenarioError::Application(rejected.to_string()),
        }
    }
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;

// Parameter Errors

#[cold]
pub fn declaration(name: &str, reason: impl Into<String>) -> ScenarioError {
    ScenarioError::Declaration {
        name: name.to_string(),
        reason: reason.into(),
    }
}

#[cold]
pub fn undeclared_parameter(name: &str) -> ScenarioError {
    ScenarioError::UndeclaredParameter(name.to_string())
}

#[cold]
pub fn parameter_type(name: &str, reason: impl Into<String>) -> ScenarioError {
    ScenarioError::ParameterType {
        name: name.to_string(),
        reason: reason.into(),
    }
}

// Runtime Errors

#[cold]
pub fn unknown_entity(name: &str) -> ScenarioError {
    ScenarioError::UnknownEntity(name.to_string())
}

#[cold]
pub fn invalid_state(element: &str, operation: &'static str, state: &'static str) -> ScenarioError {
    ScenarioError::InvalidState {
        element: element.to_string(),
        operation,
        state,
    }
}

#[cold]
pub fn rejected(entity: &str, reason: impl std::fmt::Display) -> ScenarioError {
    ScenarioError::Application(format!("{entity}: {reason}"))
}

// Configuration Errors

#[cold]
pub fn configuration(message: impl Into<String>) -> ScenarioError {
    ScenarioError::Configuration(message.into())
}
