//! Repository port for provider skills.

use crate::persistence::RepositoryResult;
use crate::provider::domain::{ProviderId, ProviderSkill};
use async_trait::async_trait;

/// Provider skill persistence contract.
///
/// Callers verify the provider's organization before touching its skills.
#[async_trait]
pub trait ProviderSkillRepository: Send + Sync {
    /// Deletes every skill of the provider. Returns the number removed.
    async fn delete_for_provider(&self, provider_id: ProviderId) -> RepositoryResult<u64>;

    /// Inserts skills, ignoring rows that already exist for the same
    /// provider and service type.
    async fn insert(&self, skills: &[ProviderSkill]) -> RepositoryResult<()>;

    /// Lists the provider's skills.
    async fn list_for_provider(&self, provider_id: ProviderId)
    -> RepositoryResult<Vec<ProviderSkill>>;
}
