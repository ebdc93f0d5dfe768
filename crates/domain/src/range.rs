//! Closed numeric interval used for hard limits and expected ranges.

use serde::{Deserialize, Serialize};

/// Inclusive `[min, max]` interval.
///
/// `min <= max` is assumed but never enforced: an inverted range simply
/// contains no value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies within the bounds, both ends included.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}
