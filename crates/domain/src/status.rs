//! Reading status — how a sample compares to its sensor's ranges.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::range::Range;

/// Classification of a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    Ok,
    Error,
    OutOfRange,
}

impl Status {
    /// Every known status, in declaration order.
    pub const ALL: [Self; 3] = [Self::Ok, Self::Error, Self::OutOfRange];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::OutOfRange => "outOfRange",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a token is not one of the three status names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Set of statuses a reading query accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSet(BTreeSet<Status>);

impl StatusSet {
    /// Set holding every known status.
    #[must_use]
    pub fn all() -> Self {
        Self(Status::ALL.into_iter().collect())
    }

    #[must_use]
    pub fn contains(&self, status: Status) -> bool {
        self.0.contains(&status)
    }

    pub fn iter(&self) -> impl Iterator<Item = Status> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Status> for StatusSet {
    fn from_iter<I: IntoIterator<Item = Status>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Derive the status of `value` against a type's hard `limits` and a
/// sensor's `expected` range.
///
/// A hard-limit violation always wins over the soft range.
#[must_use]
pub fn classify(value: f64, limits: &Range, expected: &Range) -> Status {
    if !limits.contains(value) {
        Status::Error
    } else if !expected.contains(value) {
        Status::OutOfRange
    } else {
        Status::Ok
    }
}
