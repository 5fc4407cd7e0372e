//! Service provider aggregate root.

use super::{ProviderDomainError, ProviderId, ProviderStatus, Rating};
use crate::organization::OrganizationId;
use crate::persistence::RowVersion;
use crate::validation::{EmailAddress, PersonName, PhoneNumber};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated fields for registering a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderDetails {
    /// Provider name.
    pub name: PersonName,
    /// Contact email.
    pub email: Option<EmailAddress>,
    /// Contact phone.
    pub phone: Option<PhoneNumber>,
    /// Starting rating.
    pub rating: Rating,
    /// Initial status; fixes the provider's vocabulary.
    pub status: ProviderStatus,
}

/// A technician or contractor who performs service requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceProvider {
    id: ProviderId,
    organization_id: OrganizationId,
    name: PersonName,
    email: Option<EmailAddress>,
    phone: Option<PhoneNumber>,
    rating: Rating,
    total_jobs_completed: u64,
    status: ProviderStatus,
    version: RowVersion,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedProviderData {
    /// Persisted provider identifier.
    pub id: ProviderId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Provider name.
    pub name: PersonName,
    /// Contact email.
    pub email: Option<EmailAddress>,
    /// Contact phone.
    pub phone: Option<PhoneNumber>,
    /// Current rating.
    pub rating: Rating,
    /// Completed job counter.
    pub total_jobs_completed: u64,
    /// Current status.
    pub status: ProviderStatus,
    /// Row version.
    pub version: RowVersion,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ServiceProvider {
    /// Registers a new provider.
    #[must_use]
    pub fn new(
        organization_id: OrganizationId,
        details: ProviderDetails,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ProviderId::new(),
            organization_id,
            name: details.name,
            email: details.email,
            phone: details.phone,
            rating: details.rating,
            total_jobs_completed: 0,
            status: details.status,
            version: RowVersion::INITIAL,
            created_at: timestamp,
            updated_at: timestamp,
            deleted_at: None,
        }
    }

    /// Reconstructs a provider from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProviderData) -> Self {
        Self {
            id: data.id,
            organization_id: data.organization_id,
            name: data.name,
            email: data.email,
            phone: data.phone,
            rating: data.rating,
            total_jobs_completed: data.total_jobs_completed,
            status: data.status,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
            deleted_at: data.deleted_at,
        }
    }

    /// Returns the provider identifier.
    #[must_use]
    pub const fn id(&self) -> ProviderId {
        self.id
    }

    /// Returns the owning organization.
    #[must_use]
    pub const fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    /// Returns the provider name.
    #[must_use]
    pub const fn name(&self) -> &PersonName {
        &self.name
    }

    /// Returns the contact email.
    #[must_use]
    pub const fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// Returns the contact phone.
    #[must_use]
    pub const fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }

    /// Returns the rating.
    #[must_use]
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// Returns the number of completed jobs.
    #[must_use]
    pub const fn total_jobs_completed(&self) -> u64 {
        self.total_jobs_completed
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> ProviderStatus {
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

    /// Returns the soft-delete timestamp.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns `true` once the provider has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Changes the status within the provider's vocabulary.
    ///
    /// Any value of the same vocabulary is accepted, including the current
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderDomainError::VocabularyMismatch`] when `status`
    /// belongs to the other vocabulary.
    pub fn update_status(
        &mut self,
        status: ProviderStatus,
        clock: &impl Clock,
    ) -> Result<(), ProviderDomainError> {
        let vocabulary = self.status.vocabulary();
        if status.vocabulary() != vocabulary {
            return Err(ProviderDomainError::VocabularyMismatch {
                provider_id: self.id,
                vocabulary,
                requested: status,
            });
        }
        self.status = status;
        self.touch(clock);
        Ok(())
    }

    /// Marks the provider as deleted. Returns `false` when it already was.
    pub fn mark_deleted(&mut self, clock: &impl Clock) -> bool {
        if self.deleted_at.is_some() {
            return false;
        }
        let timestamp = clock.utc();
        self.deleted_at = Some(timestamp);
        self.stamp(timestamp);
        true
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.stamp(clock.utc());
    }

    fn stamp(&mut self, timestamp: DateTime<Utc>) {
        self.updated_at = timestamp;
        self.version = self.version.next();
    }
}
