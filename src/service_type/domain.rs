//! Service type domain types and name matching.

use crate::organization::OrganizationId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a service type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceTypeId(Uuid);

impl ServiceTypeId {
    /// Creates a new random service type identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a service type identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ServiceTypeId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for ServiceTypeId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ServiceTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A kind of work an organization offers, such as "Plumbing".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceType {
    id: ServiceTypeId,
    organization_id: OrganizationId,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl ServiceType {
    /// Creates a new service type.
    #[must_use]
    pub fn new(
        organization_id: OrganizationId,
        name: impl Into<String>,
        description: Option<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: ServiceTypeId::new(),
            organization_id,
            name: name.into(),
            description,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a service type from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: ServiceTypeId,
        organization_id: OrganizationId,
        name: String,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            organization_id,
            name,
            description,
            created_at,
        }
    }

    /// Returns the service type identifier.
    #[must_use]
    pub const fn id(&self) -> ServiceTypeId {
        self.id
    }

    /// Returns the owning organization.
    #[must_use]
    pub const fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Picks the service type a free-text name refers to.
///
/// A case-insensitive exact match wins. Otherwise the first candidate, by
/// name, whose name contains the term (case-insensitively) is chosen. Blank
/// terms match nothing.
#[must_use]
pub fn best_match<'a, I>(candidates: I, term: &str) -> Option<&'a ServiceType>
where
    I: IntoIterator<Item = &'a ServiceType>,
{
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let mut substring_matches: Vec<&ServiceType> = Vec::new();
    for candidate in candidates {
        let haystack = candidate.name().to_lowercase();
        if haystack == needle {
            return Some(candidate);
        }
        if haystack.contains(&needle) {
            substring_matches.push(candidate);
        }
    }
    substring_matches
        .into_iter()
        .min_by(|left, right| left.name().cmp(right.name()))
}
