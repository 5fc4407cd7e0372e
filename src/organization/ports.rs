//! Directory port for organization lookup.

use super::{Organization, OrganizationId};
use crate::persistence::RepositoryResult;
use crate::validation::OrganizationSlug;
use async_trait::async_trait;

/// Organization lookup contract.
#[async_trait]
pub trait OrganizationDirectory: Send + Sync {
    /// Stores a new organization.
    ///
    /// # Errors
    ///
    /// Returns [`crate::persistence::RepositoryError::Duplicate`] when the
    /// identifier or slug is already taken.
    async fn store(&self, organization: &Organization) -> RepositoryResult<()>;

    /// Finds an organization by identifier.
    async fn find_by_id(&self, id: OrganizationId) -> RepositoryResult<Option<Organization>>;

    /// Finds an organization by exact slug.
    async fn find_by_slug(&self, slug: &OrganizationSlug)
    -> RepositoryResult<Option<Organization>>;
}
