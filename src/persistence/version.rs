//! Row version used by optimistic concurrency guards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic row version.
///
/// Every successful mutation of a guarded record advances the version by
/// one; conditional writes compare the stored value with the version the
/// writer read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowVersion(u64);

impl RowVersion {
    /// Version assigned to newly created records.
    pub const INITIAL: Self = Self(1);

    /// Creates a version from a stored value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the version following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for RowVersion {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for RowVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
