//! Live registry of storyboard element states.

use rustc_hash::FxHashMap;

use osc_ir::ElementState;

/// Current state of every named storyboard element, actions included.
///
/// Updated on every transition so `StoryboardElementState` conditions observe
/// transitions made earlier in the same tick.
#[derive(Clone, Debug, Default)]
pub struct ElementStates {
    states: FxHashMap<String, ElementState>,
}

impl ElementStates {
    pub fn new() -> Self {
        ElementStates::default()
    }

    /// Register `name` in standby. Returns `false` if it was already registered.
    pub fn register(&mut self, name: &str) -> bool {
        if self.states.contains_key(name) {
            return false;
        }
        self.states
            .insert(name.to_string(), ElementState::StandbyState);
        true
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<ElementState> {
        self.states.get(name).copied()
    }

    pub fn set(&mut self, name: &str, state: ElementState) {
        if let Some(slot) = self.states.get_mut(name) {
            *slot = state;
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
