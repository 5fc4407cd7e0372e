//! Repository port for provider persistence.

use crate::organization::OrganizationId;
use crate::persistence::{Page, RepositoryResult, RowVersion};
use crate::provider::domain::{ProviderId, ProviderStatus, ServiceProvider};
use async_trait::async_trait;

/// Filter and paging for provider listings. Soft-deleted providers never
/// match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderQuery {
    /// Only providers in this status.
    pub status: Option<ProviderStatus>,
    /// Case-insensitive substring of the provider name.
    pub search: Option<String>,
    /// Page window.
    pub page: Page,
}

impl ProviderQuery {
    /// Restricts to one status.
    #[must_use]
    pub const fn with_status(mut self, status: ProviderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to names containing `term`.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Sets the page window.
    #[must_use]
    pub const fn with_page(mut self, page: Page) -> Self {
        self.page = page;
        self
    }

    /// Returns `true` when `provider` is live and passes every criterion.
    #[must_use]
    pub fn matches(&self, provider: &ServiceProvider) -> bool {
        if provider.is_deleted() {
            return false;
        }
        if self.status.is_some_and(|status| provider.status() != status) {
            return false;
        }
        self.search.as_deref().is_none_or(|term| {
            provider
                .name()
                .as_str()
                .to_lowercase()
                .contains(&term.to_lowercase())
        })
    }
}

/// Provider persistence contract. Every lookup is organization scoped.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderRepository: Send + Sync {
    /// Stores a new provider.
    ///
    /// # Errors
    ///
    /// Returns [`crate::persistence::RepositoryError::Duplicate`] when the
    /// identifier already exists.
    async fn store(&self, provider: &ServiceProvider) -> RepositoryResult<()>;

    /// Overwrites an existing provider when its stored version still equals
    /// `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::persistence::RepositoryError::NotFound`] when the
    /// provider does not exist in its organization and
    /// [`crate::persistence::RepositoryError::ConcurrentModification`] when
    /// the stored version has moved on.
    async fn update(
        &self,
        provider: &ServiceProvider,
        expected: RowVersion,
    ) -> RepositoryResult<()>;

    /// Finds a provider by identifier, including soft-deleted ones.
    async fn find_by_id(
        &self,
        organization_id: OrganizationId,
        id: ProviderId,
    ) -> RepositoryResult<Option<ServiceProvider>>;

    /// Lists live providers ordered by name.
    async fn list(
        &self,
        organization_id: OrganizationId,
        query: &ProviderQuery,
    ) -> RepositoryResult<Vec<ServiceProvider>>;
}
