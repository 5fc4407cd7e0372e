//! Error types for the provider domain.

use super::{ProviderId, ProviderStatus, StatusVocabulary};
use thiserror::Error;

/// Errors raised by provider domain rules.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderDomainError {
    /// The requested status belongs to a different vocabulary than the one
    /// the provider was created with.
    #[error(
        "provider {provider_id} uses the {vocabulary} status vocabulary, got '{}'",
        requested.as_str()
    )]
    VocabularyMismatch {
        /// Provider being updated.
        provider_id: ProviderId,
        /// Vocabulary of the provider's current status.
        vocabulary: StatusVocabulary,
        /// Status that was requested.
        requested: ProviderStatus,
    },
}

/// Error returned while parsing a provider status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown provider status: {0}")]
pub struct ParseProviderStatusError(pub String);

/// Error returned while parsing a proficiency level.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown proficiency level: {0}")]
pub struct ParseProficiencyLevelError(pub String);
