//! Service layer for the request lifecycle engine.

use crate::error::ErrorKind;
use crate::organization::OrganizationId;
use crate::persistence::{EntityKind, PersistencePolicy, RepositoryError};
use crate::provider::domain::ProviderId;
use crate::provider::ports::ProviderRepository;
use crate::request::{
    domain::{
        AssignmentChange, CustomerContact, Priority, RequestDetails, RequestDomainError,
        RequestStatus, ServiceRequest, ServiceRequestId, StatusSummary,
    },
    ports::{RequestFilter, RequestQuery, ServiceRequestRepository},
};
use crate::service_type::{ServiceTypeId, ServiceTypeRepository};
use crate::validation::{
    EmailAddress, PersonName, PhoneNumber, ProblemDescription, RuleViolation, SourceLabel,
    StreetAddress, ValidationErrors, ValidationReport, rules,
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Raw input for opening a request. Every field is validated by
/// [`RequestLifecycleService::create_request`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateServiceRequest {
    customer_name: String,
    customer_email: Option<String>,
    customer_phone: Option<String>,
    address: String,
    problem_description: String,
    service_type_id: Option<String>,
    priority: Option<String>,
    source: Option<String>,
    assigned_provider_id: Option<String>,
}

impl CreateServiceRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        customer_name: impl Into<String>,
        address: impl Into<String>,
        problem_description: impl Into<String>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            address: address.into(),
            problem_description: problem_description.into(),
            ..Self::default()
        }
    }

    /// Sets the customer email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.customer_email = Some(email.into());
        self
    }

    /// Sets the customer phone.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.customer_phone = Some(phone.into());
        self
    }

    /// Sets the requested service type identifier.
    #[must_use]
    pub fn with_service_type_id(mut self, service_type_id: impl Into<String>) -> Self {
        self.service_type_id = Some(service_type_id.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the origin label.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the provider to dispatch immediately.
    #[must_use]
    pub fn with_provider_id(mut self, provider_id: impl Into<String>) -> Self {
        self.assigned_provider_id = Some(provider_id.into());
        self
    }

    fn validate(&self) -> Result<RequestDetails, ValidationErrors> {
        let mut report = ValidationReport::new();
        let name = report.check("customer_name", PersonName::parse(&self.customer_name));
        let email = report.check(
            "customer_email",
            EmailAddress::parse(self.customer_email.as_deref()),
        );
        let phone = report.check(
            "customer_phone",
            PhoneNumber::parse(self.customer_phone.as_deref()),
        );
        let address = report.check("address", StreetAddress::parse(&self.address));
        let description = report.check(
            "problem_description",
            ProblemDescription::parse(&self.problem_description),
        );
        let service_type_id = report.check(
            "service_type_id",
            rules::optional_identifier(self.service_type_id.as_deref()),
        );
        let priority = report.check("priority", parse_priority(self.priority.as_deref()));
        let source = report.check("source", SourceLabel::parse(self.source.as_deref()));
        let provider_id = report.check(
            "assigned_provider_id",
            rules::optional_identifier(self.assigned_provider_id.as_deref()),
        );

        match (
            name,
            email,
            phone,
            address,
            description,
            service_type_id,
            priority,
            source,
            provider_id,
        ) {
            (
                Some(customer_name),
                Some(customer_email),
                Some(customer_phone),
                Some(street_address),
                Some(problem_description),
                Some(service_type),
                Some(dispatch_priority),
                Some(origin),
                Some(provider),
            ) => Ok(RequestDetails {
                customer: CustomerContact {
                    name: customer_name,
                    email: customer_email,
                    phone: customer_phone,
                },
                address: street_address,
                problem_description,
                service_type_id: service_type.map(ServiceTypeId::from_uuid),
                priority: dispatch_priority,
                source: origin,
                assigned_provider_id: provider.map(ProviderId::from_uuid),
            }),
            _ => Err(report.into_errors()),
        }
    }
}

fn parse_priority(value: Option<&str>) -> Result<Priority, RuleViolation> {
    match value.map(str::trim).filter(|trimmed| !trimmed.is_empty()) {
        Some(raw) => rules::member::<Priority>(raw, Priority::NAMES),
        None => Ok(Priority::default()),
    }
}

/// A validated status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionCommand {
    request_id: ServiceRequestId,
    status: RequestStatus,
    assignment: AssignmentChange,
}

impl TransitionCommand {
    /// Creates a command from typed values.
    #[must_use]
    pub const fn new(
        request_id: ServiceRequestId,
        status: RequestStatus,
        assignment: AssignmentChange,
    ) -> Self {
        Self {
            request_id,
            status,
            assignment,
        }
    }

    /// Parses a command from wire values, reporting every invalid field.
    ///
    /// `assigned_provider_id` distinguishes an absent field (`None`) from an
    /// explicit null (`Some(None)`).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] naming `id`, `status` or
    /// `assigned_provider_id`.
    pub fn parse(
        request_id: &str,
        status: &str,
        assigned_provider_id: Option<Option<&str>>,
    ) -> Result<Self, ValidationErrors> {
        let mut report = ValidationReport::new();
        let id = report.check("id", rules::identifier(request_id));
        let target = report.check(
            "status",
            rules::member::<RequestStatus>(status, RequestStatus::NAMES),
        );
        let assignment = report.check(
            "assigned_provider_id",
            AssignmentChange::from_field(assigned_provider_id),
        );
        match (id, target, assignment) {
            (Some(uuid), Some(status_value), Some(change)) => Ok(Self::new(
                ServiceRequestId::from_uuid(uuid),
                status_value,
                change,
            )),
            _ => Err(report.into_errors()),
        }
    }

    /// Returns the request to move.
    #[must_use]
    pub const fn request_id(&self) -> ServiceRequestId {
        self.request_id
    }

    /// Returns the target status.
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.status
    }

    /// Returns the assignment change.
    #[must_use]
    pub const fn assignment(&self) -> AssignmentChange {
        self.assignment
    }
}

/// Service-level errors for request lifecycle operations.
#[derive(Debug, Error)]
pub enum RequestLifecycleError {
    /// Input failed schema validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// A lifecycle rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] RequestDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl RequestLifecycleError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Domain(RequestDomainError::InvalidTransition { .. }) => {
                ErrorKind::InvalidTransition
            }
            Self::Repository(err) => err.kind(),
        }
    }
}

/// Result type for request lifecycle service operations.
pub type RequestLifecycleResult<T> = Result<T, RequestLifecycleError>;

/// Request lifecycle orchestration service.
pub struct RequestLifecycleService<R, P, S, C>
where
    R: ServiceRequestRepository + ?Sized,
    P: ProviderRepository + ?Sized,
    S: ServiceTypeRepository + ?Sized,
    C: Clock + Send + Sync,
{
    requests: Arc<R>,
    providers: Arc<P>,
    service_types: Arc<S>,
    clock: Arc<C>,
    policy: PersistencePolicy,
}

impl<R, P, S, C> Clone for RequestLifecycleService<R, P, S, C>
where
    R: ServiceRequestRepository + ?Sized,
    P: ProviderRepository + ?Sized,
    S: ServiceTypeRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            requests: Arc::clone(&self.requests),
            providers: Arc::clone(&self.providers),
            service_types: Arc::clone(&self.service_types),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
        }
    }
}

impl<R, P, S, C> RequestLifecycleService<R, P, S, C>
where
    R: ServiceRequestRepository + ?Sized,
    P: ProviderRepository + ?Sized,
    S: ServiceTypeRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default persistence policy.
    #[must_use]
    pub fn new(requests: Arc<R>, providers: Arc<P>, service_types: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            requests,
            providers,
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

    /// Opens a new request.
    ///
    /// The request starts `assigned` when a provider is supplied and
    /// `pending` otherwise. When the provider is deleted while the request
    /// is being stored, the new request is withdrawn again and the provider
    /// is reported as not found.
    ///
    /// # Errors
    ///
    /// Returns [`RequestLifecycleError::Validation`] listing every invalid
    /// field, a not-found error when the service type or provider does not
    /// exist in the organization, or a repository error.
    pub async fn create_request(
        &self,
        organization_id: OrganizationId,
        input: CreateServiceRequest,
    ) -> RequestLifecycleResult<ServiceRequest> {
        let details = input.validate()?;
        if let Some(service_type_id) = details.service_type_id {
            self.require_service_type(organization_id, service_type_id)
                .await?;
        }
        let assigned = details.assigned_provider_id;
        if let Some(provider_id) = assigned {
            self.require_live_provider(organization_id, provider_id)
                .await?;
        }

        let request = ServiceRequest::new(organization_id, details, &*self.clock);
        self.policy.call(self.requests.store(&request)).await?;
        if let Some(provider_id) = assigned {
            self.confirm_assignment(request.clone(), provider_id, |created| {
                let released = created.release_provider(self.clock.utc());
                created.mark_deleted(&*self.clock) || released
            })
            .await?;
        }
        tracing::info!(
            organization_id = %organization_id,
            request_id = %request.id(),
            status = %request.status(),
            "service request created"
        );
        Ok(request)
    }

    /// Moves a request to a new status, optionally changing its provider.
    ///
    /// The write is conditional on the version read at the start, so a
    /// concurrent writer is never silently overwritten. A newly assigned
    /// provider is checked again after the write and the assignment is
    /// released when the provider was deleted in between.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for a missing, foreign or deleted request or
    /// provider, [`RequestLifecycleError::Domain`] for a move outside the
    /// transition table, and a concurrent-modification error when the
    /// request changed since it was read.
    pub async fn transition(
        &self,
        organization_id: OrganizationId,
        command: TransitionCommand,
    ) -> RequestLifecycleResult<ServiceRequest> {
        let mut request = self
            .load_live(organization_id, command.request_id())
            .await?;
        if let Some(provider_id) = command.assignment().provider() {
            self.require_live_provider(organization_id, provider_id)
                .await?;
        }

        let from = request.status();
        let expected = request.version();
        request.transition_to(command.status(), command.assignment(), &*self.clock)?;
        self.policy
            .call(self.requests.update(&request, expected))
            .await
            .inspect_err(|err| {
                if matches!(err, RepositoryError::ConcurrentModification { .. }) {
                    tracing::warn!(
                        request_id = %request.id(),
                        expected_version = %expected,
                        "status update lost a concurrent write race"
                    );
                }
            })?;
        if let Some(provider_id) = command.assignment().provider() {
            self.confirm_assignment(request.clone(), provider_id, |moved| {
                moved.release_provider(self.clock.utc())
            })
            .await?;
        }
        tracing::info!(
            organization_id = %organization_id,
            request_id = %request.id(),
            from = %from,
            to = %request.status(),
            assigned_provider_id = ?request.assigned_provider_id(),
            "service request transitioned"
        );
        Ok(request)
    }

    /// Soft-deletes a request. Repeating the call is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the request does not exist in the
    /// organization, or a repository error.
    pub async fn soft_delete(
        &self,
        organization_id: OrganizationId,
        request_id: ServiceRequestId,
    ) -> RequestLifecycleResult<ServiceRequest> {
        let mut request = self.find(organization_id, request_id).await?;
        let expected = request.version();
        if request.mark_deleted(&*self.clock) {
            self.policy
                .call(self.requests.update(&request, expected))
                .await?;
            tracing::info!(
                organization_id = %organization_id,
                request_id = %request_id,
                "service request soft-deleted"
            );
        }
        Ok(request)
    }

    /// Retrieves a request by identifier, including soft-deleted ones.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the request does not exist in the
    /// organization, or a repository error.
    pub async fn find(
        &self,
        organization_id: OrganizationId,
        request_id: ServiceRequestId,
    ) -> RequestLifecycleResult<ServiceRequest> {
        self.policy
            .call_idempotent(|| self.requests.find_by_id(organization_id, request_id))
            .await?
            .ok_or_else(|| {
                RepositoryError::not_found(EntityKind::ServiceRequest, request_id).into()
            })
    }

    /// Lists live requests.
    ///
    /// # Errors
    ///
    /// Returns [`RequestLifecycleError::Repository`] when the lookup fails.
    pub async fn list(
        &self,
        organization_id: OrganizationId,
        query: &RequestQuery,
    ) -> RequestLifecycleResult<Vec<ServiceRequest>> {
        Ok(self
            .policy
            .call_idempotent(|| self.requests.list(organization_id, query))
            .await?)
    }

    /// Counts live requests matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestLifecycleError::Repository`] when the lookup fails.
    pub async fn count(
        &self,
        organization_id: OrganizationId,
        filter: &RequestFilter,
    ) -> RequestLifecycleResult<u64> {
        Ok(self
            .policy
            .call_idempotent(|| self.requests.count(organization_id, filter))
            .await?)
    }

    /// Returns per-status counts of live requests, zeros included.
    ///
    /// # Errors
    ///
    /// Returns [`RequestLifecycleError::Repository`] when the lookup fails.
    pub async fn status_summary(
        &self,
        organization_id: OrganizationId,
    ) -> RequestLifecycleResult<StatusSummary> {
        let counts = self
            .policy
            .call_idempotent(|| self.requests.count_by_status(organization_id))
            .await?;
        Ok(StatusSummary::from_counts(counts))
    }

    /// Returns the statuses a live request may move to next.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for a missing, foreign or deleted request.
    pub async fn allowed_transitions(
        &self,
        organization_id: OrganizationId,
        request_id: ServiceRequestId,
    ) -> RequestLifecycleResult<Vec<RequestStatus>> {
        let request = self.load_live(organization_id, request_id).await?;
        Ok(request.status().allowed_transitions().to_vec())
    }

    async fn load_live(
        &self,
        organization_id: OrganizationId,
        request_id: ServiceRequestId,
    ) -> RequestLifecycleResult<ServiceRequest> {
        let request = self.find(organization_id, request_id).await?;
        if request.is_deleted() {
            return Err(RepositoryError::not_found(EntityKind::ServiceRequest, request_id).into());
        }
        Ok(request)
    }

    async fn require_live_provider(
        &self,
        organization_id: OrganizationId,
        provider_id: ProviderId,
    ) -> RequestLifecycleResult<()> {
        let provider = self
            .policy
            .call_idempotent(|| self.providers.find_by_id(organization_id, provider_id))
            .await?;
        match provider {
            Some(found) if !found.is_deleted() => Ok(()),
            _ => Err(RepositoryError::not_found(EntityKind::Provider, provider_id).into()),
        }
    }

    /// Re-reads an assigned provider after the request was written. When the
    /// provider has been deleted meanwhile, `withdraw` undoes the assignment
    /// and the result is stored with a version-guarded write; losing that
    /// write means the deletion sweep already released the request.
    async fn confirm_assignment(
        &self,
        mut request: ServiceRequest,
        provider_id: ProviderId,
        withdraw: impl FnOnce(&mut ServiceRequest) -> bool + Send,
    ) -> RequestLifecycleResult<()> {
        let organization_id = request.organization_id();
        let provider = self
            .policy
            .call_idempotent(|| self.providers.find_by_id(organization_id, provider_id))
            .await?;
        if provider.is_some_and(|found| !found.is_deleted()) {
            return Ok(());
        }

        let expected = request.version();
        if withdraw(&mut request) {
            match self
                .policy
                .call(self.requests.update(&request, expected))
                .await
            {
                Ok(()) | Err(RepositoryError::ConcurrentModification { .. }) => {}
                Err(err) => return Err(err.into()),
            }
        }
        tracing::warn!(
            request_id = %request.id(),
            provider_id = %provider_id,
            "provider deleted during assignment; assignment withdrawn"
        );
        Err(RepositoryError::not_found(EntityKind::Provider, provider_id).into())
    }

    async fn require_service_type(
        &self,
        organization_id: OrganizationId,
        service_type_id: ServiceTypeId,
    ) -> RequestLifecycleResult<()> {
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
