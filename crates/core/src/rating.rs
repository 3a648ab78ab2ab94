//! Star (rating) bounds and edge-submission outcomes.

use serde::Serialize;

use crate::error::CoreError;

/// Default lowest accepted star value.
pub const DEFAULT_STAR_MIN_VALUE: i16 = 1;

/// Default highest accepted star value.
pub const DEFAULT_STAR_MAX_VALUE: i16 = 10;

/// Inclusive `[min, max]` range for star values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarBounds {
    min: i16,
    max: i16,
}

impl StarBounds {
    pub fn new(min: i16, max: i16) -> Result<Self, CoreError> {
        if min > max {
            return Err(CoreError::Validation(format!(
                "Star minimum {min} exceeds maximum {max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i16 {
        self.min
    }

    pub fn max(&self) -> i16 {
        self.max
    }

    /// Check a submitted value, returning it narrowed to the storage type.
    pub fn validate(&self, value: i64) -> Result<i16, CoreError> {
        if value < i64::from(self.min) || value > i64::from(self.max) {
            return Err(CoreError::Validation(format!(
                "Star value must be between {} and {}, got {value}",
                self.min, self.max
            )));
        }
        // In range of two i16 bounds, so the narrowing cannot fail.
        i16::try_from(value).map_err(|_| CoreError::Internal("star value overflow".into()))
    }
}

impl Default for StarBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_STAR_MIN_VALUE,
            max: DEFAULT_STAR_MAX_VALUE,
        }
    }
}

/// Result of an upsert on a unique `(user, target)` edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "lowercase")]
pub enum SubmitOutcome<T> {
    Created(T),
    Updated(T),
}

impl<T> SubmitOutcome<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, SubmitOutcome::Created(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            SubmitOutcome::Created(value) | SubmitOutcome::Updated(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn default_bounds_are_one_to_ten() {
        let bounds = StarBounds::default();
        assert_eq!((bounds.min(), bounds.max()), (1, 10));
    }

    #[test]
    fn validate_accepts_inclusive_edges() {
        let bounds = StarBounds::default();
        assert_eq!(bounds.validate(1).unwrap(), 1);
        assert_eq!(bounds.validate(10).unwrap(), 10);
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let bounds = StarBounds::default();
        assert_matches!(bounds.validate(0), Err(CoreError::Validation(_)));
        assert_matches!(bounds.validate(11), Err(CoreError::Validation(_)));
        assert_matches!(bounds.validate(i64::MAX), Err(CoreError::Validation(_)));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        assert_matches!(StarBounds::new(5, 2), Err(CoreError::Validation(_)));
    }

    #[test]
    fn outcome_reports_creation() {
        assert!(SubmitOutcome::Created(1).is_created());
        assert!(!SubmitOutcome::Updated(1).is_created());
        assert_eq!(SubmitOutcome::Updated(4).into_inner(), 4);
    }
}
