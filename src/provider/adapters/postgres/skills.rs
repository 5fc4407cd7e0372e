//! `PostgreSQL` provider skill repository.

use super::{models::ProviderSkillRow, schema::provider_skills};
use crate::persistence::postgres::{FieldlinePgPool, map_diesel_error, run_blocking};
use crate::persistence::{RepositoryError, RepositoryResult};
use crate::provider::domain::{ProficiencyLevel, ProviderId, ProviderSkill};
use crate::provider::ports::ProviderSkillRepository;
use crate::service_type::ServiceTypeId;
use async_trait::async_trait;
use diesel::prelude::*;

/// `PostgreSQL`-backed provider skill repository.
#[derive(Debug, Clone)]
pub struct PostgresProviderSkillRepository {
    pool: FieldlinePgPool,
}

impl PostgresProviderSkillRepository {
    /// Creates a repository from a connection pool.
    #[must_use]
    pub const fn new(pool: FieldlinePgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProviderSkillRepository for PostgresProviderSkillRepository {
    async fn delete_for_provider(&self, provider_id: ProviderId) -> RepositoryResult<u64> {
        run_blocking(&self.pool, move |connection| {
            let removed = diesel::delete(
                provider_skills::table
                    .filter(provider_skills::provider_id.eq(provider_id.into_inner())),
            )
            .execute(connection)
            .map_err(map_diesel_error)?;
            u64::try_from(removed).map_err(RepositoryError::persistence)
        })
        .await
    }

    async fn insert(&self, skills: &[ProviderSkill]) -> RepositoryResult<()> {
        if skills.is_empty() {
            return Ok(());
        }
        let rows: Vec<ProviderSkillRow> = skills
            .iter()
            .map(|skill| ProviderSkillRow {
                provider_id: skill.provider_id().into_inner(),
                service_type_id: skill.service_type_id().into_inner(),
                proficiency_level: skill.proficiency().as_str().to_owned(),
                created_at: skill.created_at(),
            })
            .collect();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(provider_skills::table)
                .values(&rows)
                .on_conflict_do_nothing()
                .execute(connection)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await
    }

    async fn list_for_provider(
        &self,
        provider_id: ProviderId,
    ) -> RepositoryResult<Vec<ProviderSkill>> {
        run_blocking(&self.pool, move |connection| {
            let rows = provider_skills::table
                .filter(provider_skills::provider_id.eq(provider_id.into_inner()))
                .order(provider_skills::created_at.asc())
                .select(ProviderSkillRow::as_select())
                .load::<ProviderSkillRow>(connection)
                .map_err(map_diesel_error)?;
            rows.into_iter()
                .map(|row| {
                    let proficiency = ProficiencyLevel::try_from(row.proficiency_level.as_str())
                        .map_err(RepositoryError::persistence)?;
                    Ok(ProviderSkill::new(
                        ProviderId::from_uuid(row.provider_id),
                        ServiceTypeId::from_uuid(row.service_type_id),
                        proficiency,
                        row.created_at,
                    ))
                })
                .collect()
        })
        .await
    }
}
