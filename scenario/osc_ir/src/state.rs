//! Storyboard element states.

use std::fmt;

/// Observable state of a storyboard element.
///
/// The `*Transition` states are visible for exactly one tick before the element
/// settles into `RunningState` or `CompleteState`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum ElementState {
    #[default]
    StandbyState,
    StartTransition,
    RunningState,
    EndTransition,
    StopTransition,
    SkipTransition,
    CompleteState,
}

impl ElementState {
    /// Started and not yet ended.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, ElementState::StartTransition | ElementState::RunningState)
    }

    /// Ended by any route: completion, stop or skip.
    #[inline]
    pub fn is_done(self) -> bool {
        matches!(
            self,
            ElementState::EndTransition
                | ElementState::StopTransition
                | ElementState::SkipTransition
                | ElementState::CompleteState
        )
    }

    #[inline]
    pub fn is_transition(self) -> bool {
        matches!(
            self,
            ElementState::StartTransition
                | ElementState::EndTransition
                | ElementState::StopTransition
                | ElementState::SkipTransition
        )
    }

    /// State this one becomes at the next tick's settle pass.
    pub fn settled(self) -> ElementState {
        match self {
            ElementState::StartTransition => ElementState::RunningState,
            ElementState::EndTransition
            | ElementState::StopTransition
            | ElementState::SkipTransition => ElementState::CompleteState,
            other => other,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementState::StandbyState => "standbyState",
            ElementState::StartTransition => "startTransition",
            ElementState::RunningState => "runningState",
            ElementState::EndTransition => "endTransition",
            ElementState::StopTransition => "stopTransition",
            ElementState::SkipTransition => "skipTransition",
            ElementState::CompleteState => "completeState",
        }
    }
}

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
