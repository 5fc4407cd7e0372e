//! Organization domain types.

use crate::validation::OrganizationSlug;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a tenant organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(Uuid);

impl OrganizationId {
    /// Creates a new random organization identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an organization identifier from an existing UUID.
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

impl Default for OrganizationId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for OrganizationId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tenant organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    id: OrganizationId,
    slug: OrganizationSlug,
    name: String,
    created_at: DateTime<Utc>,
}

impl Organization {
    /// Creates a new organization.
    #[must_use]
    pub fn new(slug: OrganizationSlug, name: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            id: OrganizationId::new(),
            slug,
            name: name.into(),
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an organization from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: OrganizationId,
        slug: OrganizationSlug,
        name: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            slug,
            name,
            created_at,
        }
    }

    /// Returns the organization identifier.
    #[must_use]
    pub const fn id(&self) -> OrganizationId {
        self.id
    }

    /// Returns the URL slug.
    #[must_use]
    pub const fn slug(&self) -> &OrganizationSlug {
        &self.slug
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
