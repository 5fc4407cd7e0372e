//! Provider lifecycle service.

use crate::error::ErrorKind;
use crate::organization::OrganizationId;
use crate::persistence::{EntityKind, PersistencePolicy, RepositoryError};
use crate::provider::{
    domain::{
        ProficiencyLevel, ProviderDetails, ProviderDomainError, ProviderId, ProviderSkill,
        ProviderStatus, Rating, ServiceProvider,
    },
    ports::{ProviderQuery, ProviderRepository, ProviderSkillRepository},
};
use crate::request::ports::ServiceRequestRepository;
use crate::service_type::{ServiceTypeId, ServiceTypeRepository};
use crate::validation::{
    EmailAddress, PersonName, PhoneNumber, RuleViolation, ValidationErrors, ValidationReport,
    rules,
};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Number of orphaning passes attempted before a provider deletion gives up.
const ORPHAN_PASSES: u32 = 3;

/// Raw input for registering a provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterProvider {
    name: String,
    email: Option<String>,
    phone: Option<String>,
    rating: Option<f64>,
    status: Option<String>,
}

impl RegisterProvider {
    /// Creates a registration with the required name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the contact email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the contact phone.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the starting rating.
    #[must_use]
    pub const fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Sets the initial status, which also fixes the status vocabulary.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    fn validate(&self) -> Result<ProviderDetails, ValidationErrors> {
        let mut report = ValidationReport::new();
        let name = report.check("name", PersonName::parse(&self.name));
        let email = report.check("email", EmailAddress::parse(self.email.as_deref()));
        let phone = report.check("phone", PhoneNumber::parse(self.phone.as_deref()));
        let rating = report.check(
            "rating",
            self.rating.map_or_else(|| Ok(Rating::default()), Rating::new),
        );
        let status = report.check("status", parse_status(self.status.as_deref()));

        match (name, email, phone, rating, status) {
            (
                Some(provider_name),
                Some(contact_email),
                Some(contact_phone),
                Some(starting_rating),
                Some(initial_status),
            ) => Ok(ProviderDetails {
                name: provider_name,
                email: contact_email,
                phone: contact_phone,
                rating: starting_rating,
                status: initial_status,
            }),
            _ => Err(report.into_errors()),
        }
    }
}

fn parse_status(value: Option<&str>) -> Result<ProviderStatus, RuleViolation> {
    match value.map(str::trim).filter(|trimmed| !trimmed.is_empty()) {
        Some(raw) => rules::member::<ProviderStatus>(raw, ProviderStatus::NAMES),
        None => Ok(ProviderStatus::default()),
    }
}

/// Outcome of a provider soft deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderDeletion {
    /// The provider after deletion.
    pub provider: ServiceProvider,
    /// Requests whose assignment was cleared by this call.
    pub orphaned_requests: u64,
}

/// Service-level errors for provider operations.
#[derive(Debug, Error)]
pub enum ProviderLifecycleError {
    /// Input failed schema validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ProviderDomainError> for ProviderLifecycleError {
    fn from(err: ProviderDomainError) -> Self {
        match err {
            ProviderDomainError::VocabularyMismatch { vocabulary, .. } => {
                Self::Validation(ValidationErrors::single("status", vocabulary.violation()))
            }
        }
    }
}

impl ProviderLifecycleError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Repository(err) => err.kind(),
        }
    }
}

/// Result type for provider lifecycle operations.
pub type ProviderLifecycleResult<T> = Result<T, ProviderLifecycleError>;

/// Provider lifecycle orchestration service.
pub struct ProviderLifecycleService<P, K, R, S, C>
where
    P: ProviderRepository + ?Sized,
    K: ProviderSkillRepository + ?Sized,
    R: ServiceRequestRepository + ?Sized,
    S: ServiceTypeRepository + ?Sized,
    C: Clock + Send + Sync,
{
    providers: Arc<P>,
    skills: Arc<K>,
    requests: Arc<R>,
    service_types: Arc<S>,
    clock: Arc<C>,
    policy: PersistencePolicy,
}

impl<P, K, R, S, C> Clone for ProviderLifecycleService<P, K, R, S, C>
where
    P: ProviderRepository + ?Sized,
    K: ProviderSkillRepository + ?Sized,
    R: ServiceRequestRepository + ?Sized,
    S: ServiceTypeRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            providers: Arc::clone(&self.providers),
            skills: Arc::clone(&self.skills),
            requests: Arc::clone(&self.requests),
            service_types: Arc::clone(&self.service_types),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
        }
    }
}

impl<P, K, R, S, C> ProviderLifecycleService<P, K, R, S, C>
where
    P: ProviderRepository + ?Sized,
    K: ProviderSkillRepository + ?Sized,
    R: ServiceRequestRepository + ?Sized,
    S: ServiceTypeRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default persistence policy.
    #[must_use]
    pub fn new(
        providers: Arc<P>,
        skills: Arc<K>,
        requests: Arc<R>,
        service_types: Arc<S>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            providers,
            skills,
            requests,
            service_types,
            clock,
            policy: PersistencePolicy::default(),
        }
    }

    /// Replaces the persistence policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: PersistencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Registers a provider. Rating defaults to 0.0 and status to `active`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderLifecycleError::Validation`] listing every invalid
    /// field, or a repository error.
    pub async fn register_provider(
        &self,
        organization_id: OrganizationId,
        input: RegisterProvider,
    ) -> ProviderLifecycleResult<ServiceProvider> {
        let details = input.validate()?;
        let provider = ServiceProvider::new(organization_id, details, &*self.clock);
        self.policy.call(self.providers.store(&provider)).await?;
        tracing::info!(
            organization_id = %organization_id,
            provider_id = %provider.id(),
            status = %provider.status(),
            "provider registered"
        );
        Ok(provider)
    }

    /// Retrieves a provider, including soft-deleted ones.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the provider does not exist in the
    /// organization, or a repository error.
    pub async fn find_provider(
        &self,
        organization_id: OrganizationId,
        provider_id: ProviderId,
    ) -> ProviderLifecycleResult<ServiceProvider> {
        self.policy
            .call_idempotent(|| self.providers.find_by_id(organization_id, provider_id))
            .await?
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Provider, provider_id).into())
    }

    /// Lists live providers.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderLifecycleError::Repository`] when the lookup fails.
    pub async fn list_providers(
        &self,
        organization_id: OrganizationId,
        query: &ProviderQuery,
    ) -> ProviderLifecycleResult<Vec<ServiceProvider>> {
        Ok(self
            .policy
            .call_idempotent(|| self.providers.list(organization_id, query))
            .await?)
    }

    /// Sets a provider's status within its vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderLifecycleError::Validation`] on field `status` for
    /// unknown values and values of the other vocabulary, and a not-found
    /// error for a missing or deleted provider.
    pub async fn update_provider_status(
        &self,
        organization_id: OrganizationId,
        provider_id: ProviderId,
        status: &str,
    ) -> ProviderLifecycleResult<ServiceProvider> {
        let requested = rules::member::<ProviderStatus>(status, ProviderStatus::NAMES)
            .map_err(|violation| ValidationErrors::single("status", violation))?;
        let mut provider = self.load_live(organization_id, provider_id).await?;
        let previous = provider.status();
        let expected = provider.version();
        provider.update_status(requested, &*self.clock)?;
        self.policy
            .call(self.providers.update(&provider, expected))
            .await?;
        tracing::info!(
            organization_id = %organization_id,
            provider_id = %provider_id,
            from = %previous,
            to = %requested,
            "provider status updated"
        );
        Ok(provider)
    }

    /// Replaces the provider's skill set.
    ///
    /// Every reference is checked before anything is written. Existing rows
    /// are then deleted and one row per distinct service type is inserted
    /// with the default proficiency. The two writes are not atomic; a
    /// repeated call converges on the same set.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for a missing or deleted provider or an
    /// unknown service type, or a repository error.
    pub async fn replace_skills(
        &self,
        organization_id: OrganizationId,
        provider_id: ProviderId,
        service_type_ids: &[ServiceTypeId],
    ) -> ProviderLifecycleResult<Vec<ProviderSkill>> {
        self.load_live(organization_id, provider_id).await?;
        let distinct: BTreeSet<ServiceTypeId> = service_type_ids.iter().copied().collect();
        for service_type_id in &distinct {
            self.require_service_type(organization_id, *service_type_id)
                .await?;
        }

        let recorded_at = self.clock.utc();
        let replacement: Vec<ProviderSkill> = distinct
            .into_iter()
            .map(|service_type_id| {
                ProviderSkill::new(
                    provider_id,
                    service_type_id,
                    ProficiencyLevel::default(),
                    recorded_at,
                )
            })
            .collect();

        let removed = self
            .policy
            .call_idempotent(|| self.skills.delete_for_provider(provider_id))
            .await?;
        self.policy
            .call_idempotent(|| self.skills.insert(&replacement))
            .await?;
        tracing::info!(
            organization_id = %organization_id,
            provider_id = %provider_id,
            removed,
            inserted = replacement.len(),
            "provider skills replaced"
        );
        Ok(replacement)
    }

    /// Returns the provider's current skills.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the provider does not exist in the
    /// organization, or a repository error.
    pub async fn skills(
        &self,
        organization_id: OrganizationId,
        provider_id: ProviderId,
    ) -> ProviderLifecycleResult<Vec<ProviderSkill>> {
        self.find_provider(organization_id, provider_id).await?;
        Ok(self
            .policy
            .call_idempotent(|| self.skills.list_for_provider(provider_id))
            .await?)
    }

    /// Soft-deletes a provider after releasing every request assigned to it.
    ///
    /// Orphaning runs first and aborts the call on failure, so a provider is
    /// never deleted while requests still reference it. Once the provider is
    /// marked deleted one more sweep releases any assignment written between
    /// the last orphaning pass and the delete. Deleting an already-deleted
    /// provider repeats the orphaning and succeeds.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the provider does not exist in the
    /// organization, a concurrent-modification error when assignments keep
    /// reappearing or the provider changed since it was read, or a
    /// repository error.
    pub async fn soft_delete_provider(
        &self,
        organization_id: OrganizationId,
        provider_id: ProviderId,
    ) -> ProviderLifecycleResult<ProviderDeletion> {
        let mut provider = self.find_provider(organization_id, provider_id).await?;
        let mut orphaned_requests = self.orphan_requests(organization_id, provider_id).await?;

        let expected = provider.version();
        if provider.mark_deleted(&*self.clock) {
            self.policy
                .call(self.providers.update(&provider, expected))
                .await?;
            let cleared_at = self.clock.utc();
            let late = self
                .policy
                .call_idempotent(|| {
                    self.requests
                        .clear_provider_assignments(organization_id, provider_id, cleared_at)
                })
                .await?;
            orphaned_requests = orphaned_requests.saturating_add(late);
            tracing::info!(
                organization_id = %organization_id,
                provider_id = %provider_id,
                orphaned_requests,
                "provider soft-deleted"
            );
        } else {
            tracing::debug!(
                provider_id = %provider_id,
                orphaned_requests,
                "provider already deleted; assignments re-checked"
            );
        }
        Ok(ProviderDeletion {
            provider,
            orphaned_requests,
        })
    }

    async fn orphan_requests(
        &self,
        organization_id: OrganizationId,
        provider_id: ProviderId,
    ) -> ProviderLifecycleResult<u64> {
        let mut orphaned: u64 = 0;
        for pass in 1..=ORPHAN_PASSES {
            let cleared_at = self.clock.utc();
            let cleared = self
                .policy
                .call_idempotent(|| {
                    self.requests
                        .clear_provider_assignments(organization_id, provider_id, cleared_at)
                })
                .await?;
            orphaned = orphaned.saturating_add(cleared);

            let remaining = self
                .policy
                .call_idempotent(|| self.requests.count_assigned_to(organization_id, provider_id))
                .await?;
            if remaining == 0 {
                return Ok(orphaned);
            }
            tracing::warn!(
                provider_id = %provider_id,
                pass,
                remaining,
                "requests were assigned to provider during orphaning"
            );
        }
        Err(RepositoryError::concurrent_modification(EntityKind::Provider, provider_id).into())
    }

    async fn load_live(
        &self,
        organization_id: OrganizationId,
        provider_id: ProviderId,
    ) -> ProviderLifecycleResult<ServiceProvider> {
        let provider = self.find_provider(organization_id, provider_id).await?;
        if provider.is_deleted() {
            return Err(RepositoryError::not_found(EntityKind::Provider, provider_id).into());
        }
        Ok(provider)
    }

    async fn require_service_type(
        &self,
        organization_id: OrganizationId,
        service_type_id: ServiceTypeId,
    ) -> ProviderLifecycleResult<()> {
        self.policy
            .call_idempotent(|| {
                self.service_types
                    .find_by_id(organization_id, service_type_id)
            })
            .await?
            .map(|_| ())
            .ok_or_else(|| {
                RepositoryError::not_found(EntityKind::ServiceType, service_type_id).into()
            })
    }
}
