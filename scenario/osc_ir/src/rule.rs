//! Comparison rules used by conditions.

use std::fmt;

/// Tolerance used by `Rule::EqualTo` and `Rule::NotEqualTo`.
pub const EQUALITY_EPSILON: f64 = 1e-9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum Rule {
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    EqualTo,
    NotEqualTo,
}

impl Rule {
    /// Compare `lhs` against `rhs`. Any NaN operand makes the comparison false,
    /// `NotEqualTo` included.
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        if lhs.is_nan() || rhs.is_nan() {
            return false;
        }
        match self {
            Rule::GreaterThan => lhs > rhs,
            Rule::GreaterOrEqual => lhs >= rhs,
            Rule::LessThan => lhs < rhs,
            Rule::LessOrEqual => lhs <= rhs,
            Rule::EqualTo => (lhs - rhs).abs() <= EQUALITY_EPSILON,
            Rule::NotEqualTo => (lhs - rhs).abs() > EQUALITY_EPSILON,
        }
    }

    /// Equality-only comparison for non-numeric operands.
    ///
    /// Returns `None` for ordering rules, which are meaningless on strings and booleans.
    pub fn apply_eq<T: PartialEq + ?Sized>(self, lhs: &T, rhs: &T) -> Option<bool> {
        match self {
            Rule::EqualTo => Some(lhs == rhs),
            Rule::NotEqualTo => Some(lhs != rhs),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Rule::GreaterThan => "greaterThan",
            Rule::GreaterOrEqual => "greaterOrEqual",
            Rule::LessThan => "lessThan",
            Rule::LessOrEqual => "lessOrEqual",
            Rule::EqualTo => "equalTo",
            Rule::NotEqualTo => "notEqualTo",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
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
    fn test_ordering_rules() {
        assert!(Rule::GreaterThan.apply(2.0, 1.0));
        assert!(!Rule::GreaterThan.apply(1.0, 1.0));
        assert!(Rule::GreaterOrEqual.apply(1.0, 1.0));
        assert!(Rule::LessThan.apply(1.5, 2.0));
        assert!(Rule::LessOrEqual.apply(2.0, 2.0));
    }

    #[test]
    fn test_equality_uses_epsilon() {
        assert!(Rule::EqualTo.apply(0.1 + 0.2, 0.3));
        assert!(!Rule::NotEqualTo.apply(0.1 + 0.2, 0.3));
        assert!(Rule::NotEqualTo.apply(1.0, 1.1));
    }

    #[test]
    fn test_nan_never_matches() {
        assert!(!Rule::NotEqualTo.apply(f64::NAN, 1.0));
        assert!(!Rule::LessThan.apply(f64::NAN, 1.0));
    }

    #[test]
    fn test_apply_eq_rejects_ordering() {
        assert_eq!(Rule::EqualTo.apply_eq("a", "a"), Some(true));
        assert_eq!(Rule::NotEqualTo.apply_eq(&true, &false), Some(true));
        assert_eq!(Rule::LessThan.apply_eq("a", "b"), None);
    }
}
