//! Triggers: OR over condition groups, AND within a group, with an edge latch.

use osc_ir::{ConditionDef, TriggerDef};
use tracing::trace;

use crate::condition::{evaluate, Snapshot};
use crate::errors::ScenarioResult;
use crate::scope::Scope;

#[derive(Clone, Debug, Default)]
pub struct Trigger {
    groups: Vec<Vec<ConditionDef>>,
    /// Result of the most recent evaluation.
    current_value: bool,
}

impl Trigger {
    pub fn new(def: TriggerDef) -> Self {
        Trigger {
            groups: def
                .condition_groups
                .into_iter()
                .map(|group| group.conditions)
                .collect(),
            current_value: false,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[inline]
    pub fn current_value(&self) -> bool {
        self.current_value
    }

    /// Forget the latched value, as if the trigger had never been evaluated.
    pub fn reset(&mut self) {
        self.current_value = false;
    }

    /// Evaluate every group and latch the result.
    ///
    /// An empty trigger is true. Groups stop at their first false condition and
    /// the trigger stops at its first true group.
    pub fn evaluate(&mut self, scope: &Scope, snapshot: &Snapshot<'_>) -> ScenarioResult<bool> {
        let mut value = self.groups.is_empty();
        for group in &self.groups {
            let mut all = true;
            for condition in group {
                if !evaluate(condition, scope, snapshot)? {
                    all = false;
                    break;
                }
            }
            if all {
                value = true;
                break;
            }
        }
        trace!(value, previous = self.current_value, "trigger evaluated");
        self.current_value = value;
        Ok(value)
    }

    /// Evaluate and report whether the trigger just went from false to true.
    pub fn rising(&mut self, scope: &Scope, snapshot: &Snapshot<'_>) -> ScenarioResult<bool> {
        let previous = self.current_value;
        Ok(self.evaluate(scope, snapshot)? && !previous)
    }

    /// Start-trigger semantics: a rising edge, or any evaluation of an empty trigger.
    ///
    /// A held-true condition does not start an element twice; an element with no
    /// start conditions starts whenever it is polled.
    pub fn activated(&mut self, scope: &Scope, snapshot: &Snapshot<'_>) -> ScenarioResult<bool> {
        if self.is_empty() {
            return self.evaluate(scope, snapshot);
        }
        self.rising(scope, snapshot)
    }

    pub fn conditions(&self) -> impl Iterator<Item = &ConditionDef> {
        self.groups.iter().flatten()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
