//! Repository error taxonomy.

use crate::error::ErrorKind;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Kind of record a repository error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A tenant organization.
    Organization,
    /// A service type in an organization's catalogue.
    ServiceType,
    /// A customer service request.
    ServiceRequest,
    /// A service provider.
    Provider,
}

impl EntityKind {
    /// Returns the human-readable entity name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::ServiceType => "service type",
            Self::ServiceRequest => "service request",
            Self::Provider => "provider",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// The record does not exist in the caller's organization.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record looked up.
        entity: EntityKind,
        /// Identifier looked up.
        id: Uuid,
    },

    /// A record with the same identifier already exists.
    #[error("duplicate {entity} identifier: {id}")]
    Duplicate {
        /// Kind of record inserted.
        entity: EntityKind,
        /// Conflicting identifier.
        id: Uuid,
    },

    /// A conditional write found the record changed since it was read.
    #[error("{entity} {id} was modified concurrently")]
    ConcurrentModification {
        /// Kind of record written.
        entity: EntityKind,
        /// Identifier written.
        id: Uuid,
    },

    /// The call did not complete within the configured timeout.
    #[error("persistence call timed out after {0:?}")]
    Timeout(Duration),

    /// The backend could not be reached (pool exhausted, connection lost).
    #[error("persistence backend unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// Any other persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps a connectivity error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Wraps a poisoned in-memory lock.
    pub fn poisoned(err: impl fmt::Display) -> Self {
        Self::persistence(std::io::Error::other(err.to_string()))
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(entity: EntityKind, id: impl AsRef<Uuid>) -> Self {
        Self::NotFound {
            entity,
            id: *id.as_ref(),
        }
    }

    /// Creates a concurrent-modification error.
    #[must_use]
    pub fn concurrent_modification(entity: EntityKind, id: impl AsRef<Uuid>) -> Self {
        Self::ConcurrentModification {
            entity,
            id: *id.as_ref(),
        }
    }

    /// Returns `true` for failures that may succeed when retried.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Unavailable(_))
    }

    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::ConcurrentModification { .. } => ErrorKind::ConcurrentModification,
            Self::Timeout(_) | Self::Unavailable(_) => ErrorKind::Transient,
            Self::Duplicate { .. } | Self::Persistence(_) => ErrorKind::Fatal,
        }
    }
}
