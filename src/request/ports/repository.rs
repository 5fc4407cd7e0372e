//! Repository port for service request persistence.

use crate::organization::OrganizationId;
use crate::persistence::{Page, RepositoryResult, RowVersion, SortOrder};
use crate::provider::domain::ProviderId;
use crate::request::domain::{Priority, RequestStatus, ServiceRequest, ServiceRequestId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Filter over live (not soft-deleted) requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    /// Only requests in this status.
    pub status: Option<RequestStatus>,
    /// Only requests assigned to this provider.
    pub assigned_provider_id: Option<ProviderId>,
    /// Only requests with this priority.
    pub priority: Option<Priority>,
    /// Case-insensitive substring of the customer name.
    pub search: Option<String>,
}

impl RequestFilter {
    /// Restricts to one status.
    #[must_use]
    pub const fn with_status(mut self, status: RequestStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to one assigned provider.
    #[must_use]
    pub const fn with_provider(mut self, provider_id: ProviderId) -> Self {
        self.assigned_provider_id = Some(provider_id);
        self
    }

    /// Restricts to one priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts to customer names containing `term`.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Returns `true` when `request` is live and passes every criterion.
    #[must_use]
    pub fn matches(&self, request: &ServiceRequest) -> bool {
        if request.is_deleted() {
            return false;
        }
        if self.status.is_some_and(|status| request.status() != status) {
            return false;
        }
        if self
            .assigned_provider_id
            .is_some_and(|provider_id| request.assigned_provider_id() != Some(provider_id))
        {
            return false;
        }
        if self
            .priority
            .is_some_and(|priority| request.priority() != priority)
        {
            return false;
        }
        self.search.as_deref().is_none_or(|term| {
            request
                .customer()
                .name
                .as_str()
                .to_lowercase()
                .contains(&term.to_lowercase())
        })
    }
}

/// Filter plus ordering and paging for request listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestQuery {
    /// Row filter.
    pub filter: RequestFilter,
    /// Ordering by creation time.
    pub order: SortOrder,
    /// Page window.
    pub page: Page,
}

impl RequestQuery {
    /// Creates a query with the default ordering and page.
    #[must_use]
    pub const fn new(filter: RequestFilter) -> Self {
        Self {
            filter,
            order: SortOrder::Descending,
            page: Page::new(0, Page::DEFAULT_LIMIT),
        }
    }

    /// Sets the ordering.
    #[must_use]
    pub const fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets the page window.
    #[must_use]
    pub const fn with_page(mut self, page: Page) -> Self {
        self.page = page;
        self
    }
}

/// Service request persistence contract. Every method is organization
/// scoped: a request from another organization behaves as absent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRequestRepository: Send + Sync {
    /// Stores a new request.
    ///
    /// # Errors
    ///
    /// Returns [`crate::persistence::RepositoryError::Duplicate`] when the
    /// identifier already exists.
    async fn store(&self, request: &ServiceRequest) -> RepositoryResult<()>;

    /// Writes `request` only if the stored version equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::persistence::RepositoryError::ConcurrentModification`]
    /// on a version mismatch and
    /// [`crate::persistence::RepositoryError::NotFound`] when the request
    /// does not exist in the organization.
    async fn update(&self, request: &ServiceRequest, expected: RowVersion)
    -> RepositoryResult<()>;

    /// Finds a request by identifier, including soft-deleted ones.
    async fn find_by_id(
        &self,
        organization_id: OrganizationId,
        id: ServiceRequestId,
    ) -> RepositoryResult<Option<ServiceRequest>>;

    /// Lists live requests matching the query.
    async fn list(
        &self,
        organization_id: OrganizationId,
        query: &RequestQuery,
    ) -> RepositoryResult<Vec<ServiceRequest>>;

    /// Counts live requests matching the filter.
    async fn count(
        &self,
        organization_id: OrganizationId,
        filter: &RequestFilter,
    ) -> RepositoryResult<u64>;

    /// Counts live requests per status. Statuses without requests may be
    /// omitted.
    async fn count_by_status(
        &self,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Vec<(RequestStatus, u64)>>;

    /// Clears the assignment on every request referencing the provider,
    /// soft-deleted requests included, stamping `at` and advancing versions.
    /// Returns the number of requests changed.
    async fn clear_provider_assignments(
        &self,
        organization_id: OrganizationId,
        provider_id: ProviderId,
        at: DateTime<Utc>,
    ) -> RepositoryResult<u64>;

    /// Counts requests referencing the provider, soft-deleted requests
    /// included.
    async fn count_assigned_to(
        &self,
        organization_id: OrganizationId,
        provider_id: ProviderId,
    ) -> RepositoryResult<u64>;
}
