//! Paging and ordering primitives for listing queries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Offset/limit page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Page {
    offset: u64,
    limit: u64,
}

impl Page {
    /// Limit applied when the caller does not specify one.
    pub const DEFAULT_LIMIT: u64 = 25;

    /// Largest limit a caller may request.
    pub const MAX_LIMIT: u64 = 100;

    /// Creates a page window, clamping the limit to `1..=MAX_LIMIT`.
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        let clamped = if limit == 0 {
            1
        } else if limit > Self::MAX_LIMIT {
            Self::MAX_LIMIT
        } else {
            limit
        };
        Self {
            offset,
            limit: clamped,
        }
    }

    /// Returns the number of rows skipped.
    #[must_use]
    pub const fn offset(self) -> u64 {
        self.offset
    }

    /// Returns the maximum number of rows returned.
    #[must_use]
    pub const fn limit(self) -> u64 {
        self.limit
    }

    /// Applies the window to an already ordered collection.
    #[must_use]
    pub fn slice<T>(self, items: Vec<T>) -> Vec<T> {
        let skip = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(take).collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}

/// Ordering of listing results by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    #[default]
    Descending,
}

impl SortOrder {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl TryFrom<&str> for SortOrder {
    type Error = ParseSortOrderError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(ParseSortOrderError(value.to_owned())),
        }
    }
}

/// Error returned while parsing a sort order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown sort order: {0}")]
pub struct ParseSortOrderError(pub String);
