//! In-memory repositories for providers and their skills.

use crate::organization::OrganizationId;
use crate::persistence::{EntityKind, RepositoryError, RepositoryResult, RowVersion};
use crate::provider::domain::{ProviderId, ProviderSkill, ServiceProvider};
use crate::provider::ports::{ProviderQuery, ProviderRepository, ProviderSkillRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory provider repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProviderRepository {
    state: Arc<RwLock<HashMap<ProviderId, ServiceProvider>>>,
}

impl InMemoryProviderRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProviderRepository for InMemoryProviderRepository {
    async fn store(&self, provider: &ServiceProvider) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(RepositoryError::poisoned)?;
        if state.contains_key(&provider.id()) {
            return Err(RepositoryError::Duplicate {
                entity: EntityKind::Provider,
                id: provider.id().into_inner(),
            });
        }
        state.insert(provider.id(), provider.clone());
        Ok(())
    }

    async fn update(
        &self,
        provider: &ServiceProvider,
        expected: RowVersion,
    ) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(RepositoryError::poisoned)?;
        let stored = state
            .get_mut(&provider.id())
            .filter(|stored| stored.organization_id() == provider.organization_id())
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Provider, provider.id()))?;
        if stored.version() != expected {
            return Err(RepositoryError::concurrent_modification(
                EntityKind::Provider,
                provider.id(),
            ));
        }
        *stored = provider.clone();
        Ok(())
    }

    async fn find_by_id(
        &self,
        organization_id: OrganizationId,
        id: ProviderId,
    ) -> RepositoryResult<Option<ServiceProvider>> {
        let state = self.state.read().map_err(RepositoryError::poisoned)?;
        Ok(state
            .get(&id)
            .filter(|provider| provider.organization_id() == organization_id)
            .cloned())
    }

    async fn list(
        &self,
        organization_id: OrganizationId,
        query: &ProviderQuery,
    ) -> RepositoryResult<Vec<ServiceProvider>> {
        let state = self.state.read().map_err(RepositoryError::poisoned)?;
        let mut matching: Vec<ServiceProvider> = state
            .values()
            .filter(|provider| provider.organization_id() == organization_id)
            .filter(|provider| query.matches(provider))
            .cloned()
            .collect();
        matching.sort_by(|left, right| {
            left.name()
                .as_str()
                .cmp(right.name().as_str())
                .then_with(|| left.id().cmp(&right.id()))
        });
        Ok(query.page.slice(matching))
    }
}

/// Thread-safe in-memory provider skill repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProviderSkillRepository {
    state: Arc<RwLock<HashMap<ProviderId, Vec<ProviderSkill>>>>,
}

impl InMemoryProviderSkillRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProviderSkillRepository for InMemoryProviderSkillRepository {
    async fn delete_for_provider(&self, provider_id: ProviderId) -> RepositoryResult<u64> {
        let mut state = self.state.write().map_err(RepositoryError::poisoned)?;
        let removed = state.remove(&provider_id).map_or(0, |skills| skills.len());
        u64::try_from(removed).map_err(RepositoryError::persistence)
    }

    async fn insert(&self, skills: &[ProviderSkill]) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(RepositoryError::poisoned)?;
        for skill in skills {
            let existing = state.entry(skill.provider_id()).or_default();
            let already_present = existing
                .iter()
                .any(|row| row.service_type_id() == skill.service_type_id());
            if !already_present {
                existing.push(skill.clone());
            }
        }
        Ok(())
    }

    async fn list_for_provider(
        &self,
        provider_id: ProviderId,
    ) -> RepositoryResult<Vec<ProviderSkill>> {
        let state = self.state.read().map_err(RepositoryError::poisoned)?;
        Ok(state.get(&provider_id).cloned().unwrap_or_default())
    }
}
