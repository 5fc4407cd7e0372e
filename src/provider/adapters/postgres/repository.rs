//! `PostgreSQL` provider repository.

use super::{
    models::{ProviderRecord, ProviderRow},
    schema::service_providers,
};
use crate::organization::OrganizationId;
use crate::persistence::postgres::{
    FieldlinePgPool, contains_pattern, map_diesel_error, run_blocking, to_signed, to_unsigned,
};
use crate::persistence::{EntityKind, RepositoryError, RepositoryResult, RowVersion};
use crate::provider::domain::{
    PersistedProviderData, ProviderId, ProviderStatus, Rating, ServiceProvider,
};
use crate::provider::ports::{ProviderQuery, ProviderRepository};
use crate::validation::{EmailAddress, PersonName, PhoneNumber};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed provider repository.
#[derive(Debug, Clone)]
pub struct PostgresProviderRepository {
    pool: FieldlinePgPool,
}

impl PostgresProviderRepository {
    /// Creates a repository from a connection pool.
    #[must_use]
    pub const fn new(pool: FieldlinePgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProviderRepository for PostgresProviderRepository {
    async fn store(&self, provider: &ServiceProvider) -> RepositoryResult<()> {
        let record = to_record(provider)?;
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(service_providers::table)
                .values(&record)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        RepositoryError::Duplicate {
                            entity: EntityKind::Provider,
                            id: record.id,
                        }
                    }
                    other => map_diesel_error(other),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(
        &self,
        provider: &ServiceProvider,
        expected: RowVersion,
    ) -> RepositoryResult<()> {
        let record = to_record(provider)?;
        let provider_id = provider.id();
        let expected_version = to_signed(expected.value())?;
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(
                service_providers::table
                    .filter(service_providers::id.eq(record.id))
                    .filter(service_providers::organization_id.eq(record.organization_id))
                    .filter(service_providers::version.eq(expected_version)),
            )
            .set(&record)
            .execute(connection)
            .map_err(map_diesel_error)?;
            if affected > 0 {
                return Ok(());
            }

            let exists = diesel::select(diesel::dsl::exists(
                service_providers::table
                    .filter(service_providers::id.eq(record.id))
                    .filter(service_providers::organization_id.eq(record.organization_id)),
            ))
            .get_result::<bool>(connection)
            .map_err(map_diesel_error)?;
            if exists {
                Err(RepositoryError::concurrent_modification(
                    EntityKind::Provider,
                    provider_id,
                ))
            } else {
                Err(RepositoryError::not_found(EntityKind::Provider, provider_id))
            }
        })
        .await
    }

    async fn find_by_id(
        &self,
        organization_id: OrganizationId,
        id: ProviderId,
    ) -> RepositoryResult<Option<ServiceProvider>> {
        run_blocking(&self.pool, move |connection| {
            service_providers::table
                .filter(service_providers::id.eq(id.into_inner()))
                .filter(service_providers::organization_id.eq(organization_id.into_inner()))
                .select(ProviderRow::as_select())
                .first::<ProviderRow>(connection)
                .optional()
                .map_err(map_diesel_error)?
                .map(row_to_provider)
                .transpose()
        })
        .await
    }

    async fn list(
        &self,
        organization_id: OrganizationId,
        query: &ProviderQuery,
    ) -> RepositoryResult<Vec<ServiceProvider>> {
        let status = query.status;
        let search = query.search.clone();
        let offset = to_signed(query.page.offset())?;
        let limit = to_signed(query.page.limit())?;
        run_blocking(&self.pool, move |connection| {
            let mut statement = service_providers::table
                .filter(service_providers::organization_id.eq(organization_id.into_inner()))
                .filter(service_providers::deleted_at.is_null())
                .into_boxed();
            if let Some(wanted) = status {
                statement = statement.filter(service_providers::status.eq(wanted.as_str()));
            }
            if let Some(term) = search.as_deref() {
                statement = statement.filter(service_providers::name.ilike(contains_pattern(term)));
            }
            let rows = statement
                .order((service_providers::name.asc(), service_providers::id.asc()))
                .offset(offset)
                .limit(limit)
                .select(ProviderRow::as_select())
                .load::<ProviderRow>(connection)
                .map_err(map_diesel_error)?;
            rows.into_iter().map(row_to_provider).collect()
        })
        .await
    }
}

fn to_record(provider: &ServiceProvider) -> RepositoryResult<ProviderRecord> {
    Ok(ProviderRecord {
        id: provider.id().into_inner(),
        organization_id: provider.organization_id().into_inner(),
        name: provider.name().as_str().to_owned(),
        email: provider.email().map(|email| email.as_str().to_owned()),
        phone: provider.phone().map(|phone| phone.as_str().to_owned()),
        rating: provider.rating().value(),
        total_jobs_completed: to_signed(provider.total_jobs_completed())?,
        status: provider.status().as_str().to_owned(),
        version: to_signed(provider.version().value())?,
        created_at: provider.created_at(),
        updated_at: provider.updated_at(),
        deleted_at: provider.deleted_at(),
    })
}

fn row_to_provider(row: ProviderRow) -> RepositoryResult<ServiceProvider> {
    let data = PersistedProviderData {
        id: ProviderId::from_uuid(row.id),
        organization_id: OrganizationId::from_uuid(row.organization_id),
        name: PersonName::parse(&row.name).map_err(RepositoryError::persistence)?,
        email: EmailAddress::parse(row.email.as_deref()).map_err(RepositoryError::persistence)?,
        phone: PhoneNumber::parse(row.phone.as_deref()).map_err(RepositoryError::persistence)?,
        rating: Rating::new(row.rating).map_err(RepositoryError::persistence)?,
        total_jobs_completed: to_unsigned(row.total_jobs_completed)?,
        status: ProviderStatus::try_from(row.status.as_str())
            .map_err(RepositoryError::persistence)?,
        version: RowVersion::new(to_unsigned(row.version)?),
        created_at: row.created_at,
        updated_at: row.updated_at,
        deleted_at: row.deleted_at,
    };
    Ok(ServiceProvider::from_persisted(data))
}
