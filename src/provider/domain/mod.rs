//! Domain model for service providers.
//!
//! Providers carry a status from one of two vocabularies (roster and
//! availability), a rating, and a skill set expressed as service type
//! references. Soft deletion keeps the record for audit while removing it
//! from every listing.

mod error;
mod ids;
mod provider;
mod skill;
mod status;

pub use error::{ParseProficiencyLevelError, ParseProviderStatusError, ProviderDomainError};
pub use ids::{ProviderId, Rating};
pub use provider::{PersistedProviderData, ProviderDetails, ServiceProvider};
pub use skill::{ProficiencyLevel, ProviderSkill};
pub use status::{ProviderStatus, StatusVocabulary};
