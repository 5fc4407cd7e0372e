//! In-memory repository for service requests.

use crate::organization::OrganizationId;
use crate::persistence::{
    EntityKind, RepositoryError, RepositoryResult, RowVersion, SortOrder,
};
use crate::provider::domain::ProviderId;
use crate::request::domain::{RequestStatus, ServiceRequest, ServiceRequestId};
use crate::request::ports::{RequestFilter, RequestQuery, ServiceRequestRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory request repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServiceRequestRepository {
    state: Arc<RwLock<HashMap<ServiceRequestId, ServiceRequest>>>,
}

impl InMemoryServiceRequestRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn scoped<'a>(
    state: &'a HashMap<ServiceRequestId, ServiceRequest>,
    organization_id: OrganizationId,
) -> impl Iterator<Item = &'a ServiceRequest> {
    state
        .values()
        .filter(move |request| request.organization_id() == organization_id)
}

#[async_trait]
impl ServiceRequestRepository for InMemoryServiceRequestRepository {
    async fn store(&self, request: &ServiceRequest) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(RepositoryError::poisoned)?;
        if state.contains_key(&request.id()) {
            return Err(RepositoryError::Duplicate {
                entity: EntityKind::ServiceRequest,
                id: request.id().into_inner(),
            });
        }
        state.insert(request.id(), request.clone());
        Ok(())
    }

    async fn update(
        &self,
        request: &ServiceRequest,
        expected: RowVersion,
    ) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(RepositoryError::poisoned)?;
        let stored = state
            .get_mut(&request.id())
            .filter(|stored| stored.organization_id() == request.organization_id())
            .ok_or_else(|| RepositoryError::not_found(EntityKind::ServiceRequest, request.id()))?;
        if stored.version() != expected {
            return Err(RepositoryError::concurrent_modification(
                EntityKind::ServiceRequest,
                request.id(),
            ));
        }
        *stored = request.clone();
        Ok(())
    }

    async fn find_by_id(
        &self,
        organization_id: OrganizationId,
        id: ServiceRequestId,
    ) -> RepositoryResult<Option<ServiceRequest>> {
        let state = self.state.read().map_err(RepositoryError::poisoned)?;
        Ok(state
            .get(&id)
            .filter(|request| request.organization_id() == organization_id)
            .cloned())
    }

    async fn list(
        &self,
        organization_id: OrganizationId,
        query: &RequestQuery,
    ) -> RepositoryResult<Vec<ServiceRequest>> {
        let state = self.state.read().map_err(RepositoryError::poisoned)?;
        let mut matching: Vec<ServiceRequest> = scoped(&state, organization_id)
            .filter(|request| query.filter.matches(request))
            .cloned()
            .collect();
        matching.sort_by(|left, right| {
            let by_created = left
                .created_at()
                .cmp(&right.created_at())
                .then_with(|| left.id().cmp(&right.id()));
            match query.order {
                SortOrder::Ascending => by_created,
                SortOrder::Descending => by_created.reverse(),
            }
        });
        Ok(query.page.slice(matching))
    }

    async fn count(
        &self,
        organization_id: OrganizationId,
        filter: &RequestFilter,
    ) -> RepositoryResult<u64> {
        let state = self.state.read().map_err(RepositoryError::poisoned)?;
        let total = scoped(&state, organization_id)
            .filter(|request| filter.matches(request))
            .count();
        u64::try_from(total).map_err(RepositoryError::persistence)
    }

    async fn count_by_status(
        &self,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Vec<(RequestStatus, u64)>> {
        let state = self.state.read().map_err(RepositoryError::poisoned)?;
        let mut counts: BTreeMap<RequestStatus, u64> = BTreeMap::new();
        for request in scoped(&state, organization_id).filter(|request| !request.is_deleted()) {
            let slot = counts.entry(request.status()).or_default();
            *slot = slot.saturating_add(1);
        }
        Ok(counts.into_iter().collect())
    }

    async fn clear_provider_assignments(
        &self,
        organization_id: OrganizationId,
        provider_id: ProviderId,
        at: DateTime<Utc>,
    ) -> RepositoryResult<u64> {
        let mut state = self.state.write().map_err(RepositoryError::poisoned)?;
        let mut cleared: u64 = 0;
        for request in state.values_mut().filter(|request| {
            request.organization_id() == organization_id
                && request.assigned_provider_id() == Some(provider_id)
        }) {
            if request.release_provider(at) {
                cleared = cleared.saturating_add(1);
            }
        }
        Ok(cleared)
    }

    async fn count_assigned_to(
        &self,
        organization_id: OrganizationId,
        provider_id: ProviderId,
    ) -> RepositoryResult<u64> {
        let state = self.state.read().map_err(RepositoryError::poisoned)?;
        let total = scoped(&state, organization_id)
            .filter(|request| request.assigned_provider_id() == Some(provider_id))
            .count();
        u64::try_from(total).map_err(RepositoryError::persistence)
    }
}
