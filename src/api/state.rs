//! Shared application state wired from repository adapters.

use super::error::HttpError;
use crate::organization::{
    OrganizationDirectory, OrganizationId,
    adapters::{memory::InMemoryOrganizationDirectory, postgres::PostgresOrganizationDirectory},
};
use crate::persistence::{PersistencePolicy, postgres::FieldlinePgPool};
use crate::provider::{
    adapters::{
        memory::{InMemoryProviderRepository, InMemoryProviderSkillRepository},
        postgres::{PostgresProviderRepository, PostgresProviderSkillRepository},
    },
    ports::{ProviderRepository, ProviderSkillRepository},
    services::ProviderLifecycleService,
};
use crate::request::{
    adapters::{memory::InMemoryServiceRequestRepository, postgres::PostgresServiceRequestRepository},
    ports::ServiceRequestRepository,
    services::{IntakeService, RequestLifecycleService},
};
use crate::service_type::{
    ServiceTypeRepository,
    adapters::{memory::InMemoryServiceTypeRepository, postgres::PostgresServiceTypeRepository},
};
use mockable::DefaultClock;
use std::sync::Arc;
use uuid::Uuid;

/// Request lifecycle service over whichever adapters the process runs with.
pub type RequestService = RequestLifecycleService<
    dyn ServiceRequestRepository,
    dyn ProviderRepository,
    dyn ServiceTypeRepository,
    DefaultClock,
>;

/// Provider lifecycle service over whichever adapters the process runs with.
pub type ProviderService = ProviderLifecycleService<
    dyn ProviderRepository,
    dyn ProviderSkillRepository,
    dyn ServiceRequestRepository,
    dyn ServiceTypeRepository,
    DefaultClock,
>;

/// Webhook intake over whichever adapters the process runs with.
pub type WebhookIntake = IntakeService<
    dyn OrganizationDirectory,
    dyn ServiceRequestRepository,
    dyn ProviderRepository,
    dyn ServiceTypeRepository,
    DefaultClock,
>;

/// One set of repository adapters.
#[derive(Clone)]
pub struct Repositories {
    /// Tenant directory.
    pub organizations: Arc<dyn OrganizationDirectory>,
    /// Service type catalogue.
    pub service_types: Arc<dyn ServiceTypeRepository>,
    /// Service requests.
    pub requests: Arc<dyn ServiceRequestRepository>,
    /// Providers.
    pub providers: Arc<dyn ProviderRepository>,
    /// Provider skills.
    pub skills: Arc<dyn ProviderSkillRepository>,
}

impl Repositories {
    /// Process-local adapters, used when no database is configured.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            organizations: Arc::new(InMemoryOrganizationDirectory::new()),
            service_types: Arc::new(InMemoryServiceTypeRepository::new()),
            requests: Arc::new(InMemoryServiceRequestRepository::new()),
            providers: Arc::new(InMemoryProviderRepository::new()),
            skills: Arc::new(InMemoryProviderSkillRepository::new()),
        }
    }

    /// Diesel adapters sharing one connection pool.
    #[must_use]
    pub fn postgres(pool: &FieldlinePgPool) -> Self {
        Self {
            organizations: Arc::new(PostgresOrganizationDirectory::new(pool.clone())),
            service_types: Arc::new(PostgresServiceTypeRepository::new(pool.clone())),
            requests: Arc::new(PostgresServiceRequestRepository::new(pool.clone())),
            providers: Arc::new(PostgresProviderRepository::new(pool.clone())),
            skills: Arc::new(PostgresProviderSkillRepository::new(pool.clone())),
        }
    }
}

/// State shared by every handler.
pub struct AppState {
    /// Adapters the services were built from.
    pub repositories: Repositories,
    /// Request lifecycle engine.
    pub requests: RequestService,
    /// Provider lifecycle manager.
    pub providers: ProviderService,
    /// Webhook intake.
    pub intake: WebhookIntake,
    policy: PersistencePolicy,
}

impl AppState {
    /// Builds every service over `repositories`.
    #[must_use]
    pub fn new(repositories: Repositories, policy: PersistencePolicy) -> Self {
        let clock = Arc::new(DefaultClock);
        let requests = RequestLifecycleService::new(
            Arc::clone(&repositories.requests),
            Arc::clone(&repositories.providers),
            Arc::clone(&repositories.service_types),
            Arc::clone(&clock),
        )
        .with_policy(policy);
        let providers = ProviderLifecycleService::new(
            Arc::clone(&repositories.providers),
            Arc::clone(&repositories.skills),
            Arc::clone(&repositories.requests),
            Arc::clone(&repositories.service_types),
            clock,
        )
        .with_policy(policy);
        let intake = IntakeService::new(
            Arc::clone(&repositories.organizations),
            Arc::clone(&repositories.service_types),
            requests.clone(),
        )
        .with_policy(policy);
        Self {
            repositories,
            requests,
            providers,
            intake,
            policy,
        }
    }

    /// Resolves the organization named in a tenant route.
    ///
    /// Malformed and unknown identifiers are both reported as not found.
    ///
    /// # Errors
    ///
    /// Returns a 404 [`HttpError`] when no such organization exists, or the
    /// mapped repository failure.
    pub async fn resolve_organization(&self, raw: &str) -> Result<OrganizationId, HttpError> {
        let Ok(uuid) = Uuid::parse_str(raw.trim()) else {
            return Err(HttpError::not_found());
        };
        let id = OrganizationId::from_uuid(uuid);
        let organization = self
            .policy
            .call_idempotent(|| self.repositories.organizations.find_by_id(id))
            .await?;
        organization
            .map(|found| found.id())
            .ok_or_else(HttpError::not_found)
    }
}
