//! Per-entity cursors into an action's entries.

use rustc_hash::FxHashMap;

/// Position of one entity in an action's entry list.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cursor {
    /// Entries completed so far; equal to the entry count once accomplished.
    pub index: usize,
    /// Simulation time the current entry became current.
    pub entered_at: f64,
}

/// Cursor per entity. An absent entity has not started the action.
///
/// Cursors are plain indices, so the entry list can be inspected or replaced
/// without invalidating them.
#[derive(Clone, Debug, Default)]
pub struct Accomplishments {
    cursors: FxHashMap<String, Cursor>,
}

impl Accomplishments {
    /// Put `entity` on the first entry.
    pub fn begin(&mut self, entity: &str, time: f64) {
        self.cursors.insert(
            entity.to_string(),
            Cursor {
                index: 0,
                entered_at: time,
            },
        );
    }

    pub fn get(&self, entity: &str) -> Option<Cursor> {
        self.cursors.get(entity).copied()
    }

    /// Move `entity` to its next entry. Cursors never move backward.
    pub fn advance(&mut self, entity: &str, time: f64) -> Option<Cursor> {
        let cursor = self.cursors.get_mut(entity)?;
        cursor.index += 1;
        cursor.entered_at = time;
        Some(*cursor)
    }

    /// Whether `entity` is past the last of `count` entries.
    pub fn is_past(&self, entity: &str, count: usize) -> bool {
        self.cursors
            .get(entity)
            .is_some_and(|cursor| cursor.index >= count)
    }

    pub fn clear(&mut self) {
        self.cursors.clear();
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_until_begun() {
        let mut accomplishments = Accomplishments::default();
        assert_eq!(accomplishments.get("ego"), None);
        assert_eq!(accomplishments.advance("ego", 1.0), None);
        assert!(!accomplishments.is_past("ego", 0));

        accomplishments.begin("ego", 2.0);
        assert_eq!(
            accomplishments.get("ego"),
            Some(Cursor {
                index: 0,
                entered_at: 2.0
            })
        );
    }

    #[test]
    fn test_advance_past_last_entry() {
        let mut accomplishments = Accomplishments::default();
        accomplishments.begin("ego", 0.0);
        accomplishments.advance("ego", 1.0);
        assert!(!accomplishments.is_past("ego", 2));
        let cursor = accomplishments.advance("ego", 3.0);
        assert_eq!(
            cursor,
            Some(Cursor {
                index: 2,
                entered_at: 3.0
            })
        );
        assert!(accomplishments.is_past("ego", 2));
    }
}
