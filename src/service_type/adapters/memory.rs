//! In-memory service type catalogue.

use crate::organization::OrganizationId;
use crate::persistence::{EntityKind, RepositoryError, RepositoryResult};
use crate::service_type::{ServiceType, ServiceTypeId, ServiceTypeRepository, best_match};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory service type repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServiceTypeRepository {
    state: Arc<RwLock<HashMap<ServiceTypeId, ServiceType>>>,
}

impl InMemoryServiceTypeRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ServiceTypeRepository for InMemoryServiceTypeRepository {
    async fn store(&self, service_type: &ServiceType) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(RepositoryError::poisoned)?;
        if state.contains_key(&service_type.id()) {
            return Err(RepositoryError::Duplicate {
                entity: EntityKind::ServiceType,
                id: service_type.id().into_inner(),
            });
        }
        state.insert(service_type.id(), service_type.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        organization_id: OrganizationId,
        id: ServiceTypeId,
    ) -> RepositoryResult<Option<ServiceType>> {
        let state = self.state.read().map_err(RepositoryError::poisoned)?;
        Ok(state
            .get(&id)
            .filter(|service_type| service_type.organization_id() == organization_id)
            .cloned())
    }

    async fn find_by_name(
        &self,
        organization_id: OrganizationId,
        name: &str,
    ) -> RepositoryResult<Option<ServiceType>> {
        let state = self.state.read().map_err(RepositoryError::poisoned)?;
        let scoped = state
            .values()
            .filter(|service_type| service_type.organization_id() == organization_id);
        Ok(best_match(scoped, name).cloned())
    }

    async fn list(&self, organization_id: OrganizationId) -> RepositoryResult<Vec<ServiceType>> {
        let state = self.state.read().map_err(RepositoryError::poisoned)?;
        let mut service_types: Vec<ServiceType> = state
            .values()
            .filter(|service_type| service_type.organization_id() == organization_id)
            .cloned()
            .collect();
        service_types.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(service_types)
    }
}
