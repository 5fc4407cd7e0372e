//! Service request aggregate root.

use super::{AssignmentChange, Priority, RequestDomainError, RequestStatus, ServiceRequestId};
use crate::organization::OrganizationId;
use crate::persistence::RowVersion;
use crate::provider::domain::ProviderId;
use crate::service_type::ServiceTypeId;
use crate::validation::{
    EmailAddress, PersonName, PhoneNumber, ProblemDescription, SourceLabel, StreetAddress,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Customer contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContact {
    /// Customer name.
    pub name: PersonName,
    /// Optional email address.
    pub email: Option<EmailAddress>,
    /// Optional phone number.
    pub phone: Option<PhoneNumber>,
}

/// Validated fields for opening a new request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDetails {
    /// Customer contact details.
    pub customer: CustomerContact,
    /// Service address.
    pub address: StreetAddress,
    /// What the customer reported.
    pub problem_description: ProblemDescription,
    /// Requested kind of work.
    pub service_type_id: Option<ServiceTypeId>,
    /// Dispatch priority.
    pub priority: Priority,
    /// Where the request came from.
    pub source: Option<SourceLabel>,
    /// Provider dispatched at creation time.
    pub assigned_provider_id: Option<ProviderId>,
}

/// A customer's request for on-site work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequest {
    id: ServiceRequestId,
    organization_id: OrganizationId,
    customer: CustomerContact,
    address: StreetAddress,
    problem_description: ProblemDescription,
    service_type_id: Option<ServiceTypeId>,
    priority: Priority,
    source: Option<SourceLabel>,
    assigned_provider_id: Option<ProviderId>,
    status: RequestStatus,
    version: RowVersion,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRequestData {
    /// Persisted request identifier.
    pub id: ServiceRequestId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Customer contact details.
    pub customer: CustomerContact,
    /// Service address.
    pub address: StreetAddress,
    /// Problem description.
    pub problem_description: ProblemDescription,
    /// Requested kind of work.
    pub service_type_id: Option<ServiceTypeId>,
    /// Dispatch priority.
    pub priority: Priority,
    /// Request origin label.
    pub source: Option<SourceLabel>,
    /// Assigned provider.
    pub assigned_provider_id: Option<ProviderId>,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// Row version.
    pub version: RowVersion,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ServiceRequest {
    /// Opens a new request.
    ///
    /// The request starts `assigned` when a provider is supplied and
    /// `pending` otherwise.
    #[must_use]
    pub fn new(organization_id: OrganizationId, details: RequestDetails, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let status = if details.assigned_provider_id.is_some() {
            RequestStatus::Assigned
        } else {
            RequestStatus::Pending
        };
        Self {
            id: ServiceRequestId::new(),
            organization_id,
            customer: details.customer,
            address: details.address,
            problem_description: details.problem_description,
            service_type_id: details.service_type_id,
            priority: details.priority,
            source: details.source,
            assigned_provider_id: details.assigned_provider_id,
            status,
            version: RowVersion::INITIAL,
            created_at: timestamp,
            updated_at: timestamp,
            completed_at: None,
            deleted_at: None,
        }
    }

    /// Reconstructs a request from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedRequestData) -> Self {
        Self {
            id: data.id,
            organization_id: data.organization_id,
            customer: data.customer,
            address: data.address,
            problem_description: data.problem_description,
            service_type_id: data.service_type_id,
            priority: data.priority,
            source: data.source,
            assigned_provider_id: data.assigned_provider_id,
            status: data.status,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
            completed_at: data.completed_at,
            deleted_at: data.deleted_at,
        }
    }

    /// Returns the request identifier.
    #[must_use]
    pub const fn id(&self) -> ServiceRequestId {
        self.id
    }

    /// Returns the owning organization.
    #[must_use]
    pub const fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    /// Returns the customer contact details.
    #[must_use]
    pub const fn customer(&self) -> &CustomerContact {
        &self.customer
    }

    /// Returns the service address.
    #[must_use]
    pub const fn address(&self) -> &StreetAddress {
        &self.address
    }

    /// Returns the problem description.
    #[must_use]
    pub const fn problem_description(&self) -> &ProblemDescription {
        &self.problem_description
    }

    /// Returns the requested service type.
    #[must_use]
    pub const fn service_type_id(&self) -> Option<ServiceTypeId> {
        self.service_type_id
    }

    /// Returns the dispatch priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the origin label.
    #[must_use]
    pub const fn source(&self) -> Option<&SourceLabel> {
        self.source.as_ref()
    }

    /// Returns the assigned provider.
    #[must_use]
    pub const fn assigned_provider_id(&self) -> Option<ProviderId> {
        self.assigned_provider_id
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.status
    }

    /// Returns the row version.
    #[must_use]
    pub const fn version(&self) -> RowVersion {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns when the request first entered `completed`.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the soft-delete timestamp.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns `true` once the request has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Applies a status move together with an assignment change.
    ///
    /// Re-submitting the current status is accepted only when it carries a
    /// real assignment change on a non-terminal request. On error the request
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RequestDomainError::InvalidTransition`] when the move is not
    /// in the transition table.
    pub fn transition_to(
        &mut self,
        target: RequestStatus,
        assignment: AssignmentChange,
        clock: &impl Clock,
    ) -> Result<(), RequestDomainError> {
        let permitted = if target == self.status {
            !self.status.is_terminal() && assignment.changes(self.assigned_provider_id)
        } else {
            self.status.can_transition_to(target)
        };
        if !permitted {
            return Err(RequestDomainError::InvalidTransition {
                request_id: self.id,
                from: self.status,
                to: target,
            });
        }

        let timestamp = clock.utc();
        self.assigned_provider_id = assignment.apply(self.assigned_provider_id);
        self.status = target;
        if target == RequestStatus::Completed && self.completed_at.is_none() {
            self.completed_at = Some(timestamp);
        }
        self.stamp(timestamp);
        Ok(())
    }

    /// Marks the request as deleted. Status and assignment are untouched.
    /// Returns `false` when it already was deleted.
    pub fn mark_deleted(&mut self, clock: &impl Clock) -> bool {
        if self.deleted_at.is_some() {
            return false;
        }
        let timestamp = clock.utc();
        self.deleted_at = Some(timestamp);
        self.stamp(timestamp);
        true
    }

    /// Clears the assigned provider as part of provider removal. Returns
    /// `false` when no provider was assigned.
    pub fn release_provider(&mut self, at: DateTime<Utc>) -> bool {
        if self.assigned_provider_id.take().is_none() {
            return false;
        }
        self.stamp(at);
        true
    }

    fn stamp(&mut self, timestamp: DateTime<Utc>) {
        self.updated_at = timestamp;
        self.version = self.version.next();
    }
}
