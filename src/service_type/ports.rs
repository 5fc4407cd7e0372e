//! Repository port for the service type catalogue.

use super::{ServiceType, ServiceTypeId};
use crate::organization::OrganizationId;
use crate::persistence::RepositoryResult;
use async_trait::async_trait;

/// Service type persistence contract. Every lookup is organization scoped.
#[async_trait]
pub trait ServiceTypeRepository: Send + Sync {
    /// Stores a new service type.
    ///
    /// # Errors
    ///
    /// Returns [`crate::persistence::RepositoryError::Duplicate`] when the
    /// identifier already exists.
    async fn store(&self, service_type: &ServiceType) -> RepositoryResult<()>;

    /// Finds a service type by identifier within an organization.
    async fn find_by_id(
        &self,
        organization_id: OrganizationId,
        id: ServiceTypeId,
    ) -> RepositoryResult<Option<ServiceType>>;

    /// Resolves a free-text name using [`super::best_match`] semantics.
    async fn find_by_name(
        &self,
        organization_id: OrganizationId,
        name: &str,
    ) -> RepositoryResult<Option<ServiceType>>;

    /// Lists the organization's service types ordered by name.
    async fn list(&self, organization_id: OrganizationId) -> RepositoryResult<Vec<ServiceType>>;
}
