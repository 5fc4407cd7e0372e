//! Three-way provider assignment change carried by a status update.

use crate::provider::domain::ProviderId;
use crate::validation::{RuleViolation, rules};

/// How a status update affects the assigned provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssignmentChange {
    /// Leave the current assignment untouched (field absent).
    #[default]
    Keep,
    /// Clear the assignment (explicit `null` or empty string).
    Unassign,
    /// Assign the given provider.
    Assign(ProviderId),
}

impl AssignmentChange {
    /// Interprets a wire field that distinguishes "absent" (`None`) from
    /// "present but null" (`Some(None)`).
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::InvalidIdentifier`] when a non-empty value
    /// is not a UUID.
    pub fn from_field(field: Option<Option<&str>>) -> Result<Self, RuleViolation> {
        match field {
            None => Ok(Self::Keep),
            Some(value) => Ok(rules::optional_identifier(value)?
                .map_or(Self::Unassign, |uuid| {
                    Self::Assign(ProviderId::from_uuid(uuid))
                })),
        }
    }

    /// Returns the provider being assigned, if any.
    #[must_use]
    pub const fn provider(self) -> Option<ProviderId> {
        match self {
            Self::Assign(provider_id) => Some(provider_id),
            Self::Keep | Self::Unassign => None,
        }
    }

    /// Returns `true` when applying the change to `current` would alter it.
    #[must_use]
    pub fn changes(self, current: Option<ProviderId>) -> bool {
        match self {
            Self::Keep => false,
            Self::Unassign => current.is_some(),
            Self::Assign(provider_id) => current != Some(provider_id),
        }
    }

    /// Returns the assignment resulting from applying the change.
    #[must_use]
    pub const fn apply(self, current: Option<ProviderId>) -> Option<ProviderId> {
        match self {
            Self::Keep => current,
            Self::Unassign => None,
            Self::Assign(provider_id) => Some(provider_id),
        }
    }
}
