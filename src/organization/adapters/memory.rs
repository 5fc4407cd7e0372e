//! In-memory organization directory.

use crate::organization::{Organization, OrganizationDirectory, OrganizationId};
use crate::persistence::{EntityKind, RepositoryError, RepositoryResult};
use crate::validation::OrganizationSlug;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory organization directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrganizationDirectory {
    state: Arc<RwLock<HashMap<OrganizationId, Organization>>>,
}

impl InMemoryOrganizationDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrganizationDirectory for InMemoryOrganizationDirectory {
    async fn store(&self, organization: &Organization) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(RepositoryError::poisoned)?;
        let slug_taken = state
            .values()
            .any(|existing| existing.slug() == organization.slug());
        if slug_taken || state.contains_key(&organization.id()) {
            return Err(RepositoryError::Duplicate {
                entity: EntityKind::Organization,
                id: organization.id().into_inner(),
            });
        }
        state.insert(organization.id(), organization.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: OrganizationId) -> RepositoryResult<Option<Organization>> {
        let state = self.state.read().map_err(RepositoryError::poisoned)?;
        Ok(state.get(&id).cloned())
    }

    async fn find_by_slug(
        &self,
        slug: &OrganizationSlug,
    ) -> RepositoryResult<Option<Organization>> {
        let state = self.state.read().map_err(RepositoryError::poisoned)?;
        Ok(state
            .values()
            .find(|organization| organization.slug() == slug)
            .cloned())
    }
}
