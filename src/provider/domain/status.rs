//! Provider status and its two vocabularies.

use super::ParseProviderStatusError;
use crate::validation::RuleViolation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Family of provider status values.
///
/// Some organizations track whether a provider is on the roster, others
/// track day-to-day availability. A provider keeps the vocabulary it was
/// created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusVocabulary {
    /// `active | inactive`.
    Roster,
    /// `available | busy | offline`.
    Availability,
}

impl StatusVocabulary {
    /// Returns the vocabulary name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Roster => "roster",
            Self::Availability => "availability",
        }
    }

    /// Returns the status values in this vocabulary.
    #[must_use]
    pub const fn values(self) -> &'static [&'static str] {
        match self {
            Self::Roster => &["active", "inactive"],
            Self::Availability => &["available", "busy", "offline"],
        }
    }

    /// Returns the rule violation reported when a status from another
    /// vocabulary is requested.
    #[must_use]
    pub const fn violation(self) -> RuleViolation {
        RuleViolation::WrongVocabulary {
            vocabulary: self.as_str(),
            allowed: self.values(),
        }
    }
}

impl fmt::Display for StatusVocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    /// On the roster.
    #[default]
    Active,
    /// Off the roster.
    Inactive,
    /// Free to take work.
    Available,
    /// Currently on a job.
    Busy,
    /// Not reachable.
    Offline,
}

impl ProviderStatus {
    /// Every accepted status string, across both vocabularies.
    pub const NAMES: &'static [&'static str] =
        &["active", "inactive", "available", "busy", "offline"];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Available => "available",
            Self::Busy => "busy",
            Self::Offline => "offline",
        }
    }

    /// Returns the vocabulary this status belongs to.
    #[must_use]
    pub const fn vocabulary(self) -> StatusVocabulary {
        match self {
            Self::Active | Self::Inactive => StatusVocabulary::Roster,
            Self::Available | Self::Busy | Self::Offline => StatusVocabulary::Availability,
        }
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderStatus {
    type Error = ParseProviderStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "available" => Ok(Self::Available),
            "busy" => Ok(Self::Busy),
            "offline" => Ok(Self::Offline),
            _ => Err(ParseProviderStatusError(value.to_owned())),
        }
    }
}
