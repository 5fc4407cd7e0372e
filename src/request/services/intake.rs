//! Inbound intake: turns external submissions into service requests.

use super::lifecycle::{CreateServiceRequest, RequestLifecycleError, RequestLifecycleService};
use crate::error::ErrorKind;
use crate::organization::{OrganizationDirectory, OrganizationId};
use crate::persistence::{PersistencePolicy, RepositoryError};
use crate::provider::ports::ProviderRepository;
use crate::request::domain::ServiceRequestId;
use crate::request::ports::ServiceRequestRepository;
use crate::service_type::{ServiceType, ServiceTypeRepository};
use crate::validation::{OrganizationSlug, ValidationErrors};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Source label recorded when a submission does not name one.
pub const DEFAULT_SOURCE: &str = "webhook";

/// Raw submission from an external form or integration.
///
/// Empty strings in optional fields are treated as absent. Missing
/// required fields deserialize as empty and fail validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeSubmission {
    /// Slug of the receiving organization.
    pub organization_slug: String,
    /// Customer name.
    pub customer_name: String,
    /// Customer email.
    pub customer_email: Option<String>,
    /// Customer phone.
    pub customer_phone: Option<String>,
    /// Service address.
    pub address: String,
    /// Free-text service type name, matched against the catalogue.
    pub service_type: Option<String>,
    /// Origin label such as a form name.
    pub source: Option<String>,
    /// What the customer reported.
    pub problem_description: Option<String>,
}

/// Identifiers returned for an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntakeReceipt {
    /// The new request.
    pub request_id: ServiceRequestId,
    /// The receiving organization.
    pub organization_id: OrganizationId,
}

/// Errors raised while accepting a submission.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// The organization slug is malformed.
    #[error(transparent)]
    Validation(ValidationErrors),
    /// No organization has the submitted slug.
    #[error("no organization matches the submitted slug")]
    UnknownOrganization,
    /// Creating the request failed.
    #[error(transparent)]
    Lifecycle(#[from] RequestLifecycleError),
    /// A directory or catalogue lookup failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl IntakeError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::UnknownOrganization => ErrorKind::NotFound,
            Self::Lifecycle(err) => err.kind(),
            Self::Repository(err) => err.kind(),
        }
    }

    /// Returns `true` when the submission itself was at fault. Callers
    /// report every rejection identically so that slugs and identifiers
    /// cannot be enumerated.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation | ErrorKind::NotFound | ErrorKind::InvalidTransition
        )
    }
}

/// Result type for intake operations.
pub type IntakeResult<T> = Result<T, IntakeError>;

/// Accepts external submissions on behalf of an organization.
pub struct IntakeService<O, R, P, S, C>
where
    O: OrganizationDirectory + ?Sized,
    R: ServiceRequestRepository + ?Sized,
    P: ProviderRepository + ?Sized,
    S: ServiceTypeRepository + ?Sized,
    C: Clock + Send + Sync,
{
    organizations: Arc<O>,
    service_types: Arc<S>,
    requests: RequestLifecycleService<R, P, S, C>,
    policy: PersistencePolicy,
}

impl<O, R, P, S, C> IntakeService<O, R, P, S, C>
where
    O: OrganizationDirectory + ?Sized,
    R: ServiceRequestRepository + ?Sized,
    P: ProviderRepository + ?Sized,
    S: ServiceTypeRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates an intake service on top of the request lifecycle.
    #[must_use]
    pub fn new(
        organizations: Arc<O>,
        service_types: Arc<S>,
        requests: RequestLifecycleService<R, P, S, C>,
    ) -> Self {
        Self {
            organizations,
            service_types,
            requests,
            policy: PersistencePolicy::default(),
        }
    }

    /// Replaces the persistence policy used for lookups.
    #[must_use]
    pub const fn with_policy(mut self, policy: PersistencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Accepts a submission and opens a request for it.
    ///
    /// The service type is resolved by name; an unmatched name leaves the
    /// request without a service type. A missing description is replaced
    /// with one naming the intake source.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError`]; use [`IntakeError::is_rejection`] to decide
    /// whether the submission or the system was at fault.
    pub async fn submit(&self, submission: IntakeSubmission) -> IntakeResult<IntakeReceipt> {
        let slug = OrganizationSlug::parse(&submission.organization_slug).map_err(|violation| {
            IntakeError::Validation(ValidationErrors::single("organization_slug", violation))
        })?;
        let organization = self
            .policy
            .call_idempotent(|| self.organizations.find_by_slug(&slug))
            .await?
            .ok_or(IntakeError::UnknownOrganization)?;
        let organization_id = organization.id();
        tracing::info!(
            organization_id = %organization_id,
            payload = ?submission,
            "inbound service request received"
        );

        let service_type = self
            .resolve_service_type(organization_id, submission.service_type.as_deref())
            .await?;

        let source = present(submission.source.as_deref()).unwrap_or(DEFAULT_SOURCE);
        let description = present(submission.problem_description.as_deref()).map_or_else(
            || format!("Service request submitted via {source}"),
            str::to_owned,
        );
        let mut input =
            CreateServiceRequest::new(&submission.customer_name, &submission.address, description)
                .with_source(source);
        if let Some(email) = present(submission.customer_email.as_deref()) {
            input = input.with_email(email);
        }
        if let Some(phone) = present(submission.customer_phone.as_deref()) {
            input = input.with_phone(phone);
        }
        if let Some(matched) = service_type {
            input = input.with_service_type_id(matched.id().to_string());
        }

        let request = self.requests.create_request(organization_id, input).await?;
        Ok(IntakeReceipt {
            request_id: request.id(),
            organization_id,
        })
    }

    async fn resolve_service_type(
        &self,
        organization_id: OrganizationId,
        name: Option<&str>,
    ) -> IntakeResult<Option<ServiceType>> {
        let Some(term) = present(name) else {
            return Ok(None);
        };
        let matched = self
            .policy
            .call_idempotent(|| self.service_types.find_by_name(organization_id, term))
            .await?;
        if matched.is_none() {
            tracing::debug!(
                organization_id = %organization_id,
                service_type = term,
                "no service type matches submitted name"
            );
        }
        Ok(matched)
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}
