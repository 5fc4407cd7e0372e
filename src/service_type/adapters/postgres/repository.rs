//! `PostgreSQL` service type repository.

use super::{
    models::{NewServiceTypeRow, ServiceTypeRow},
    schema::service_types,
};
use crate::organization::OrganizationId;
use crate::persistence::postgres::{
    FieldlinePgPool, contains_pattern, map_diesel_error, run_blocking,
};
use crate::persistence::{EntityKind, RepositoryError, RepositoryResult};
use crate::service_type::{ServiceType, ServiceTypeId, ServiceTypeRepository, best_match};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed service type repository.
#[derive(Debug, Clone)]
pub struct PostgresServiceTypeRepository {
    pool: FieldlinePgPool,
}

impl PostgresServiceTypeRepository {
    /// Creates a repository from a connection pool.
    #[must_use]
    pub const fn new(pool: FieldlinePgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceTypeRepository for PostgresServiceTypeRepository {
    async fn store(&self, service_type: &ServiceType) -> RepositoryResult<()> {
        let row = NewServiceTypeRow {
            id: service_type.id().into_inner(),
            organization_id: service_type.organization_id().into_inner(),
            name: service_type.name().to_owned(),
            description: service_type.description().map(str::to_owned),
            created_at: service_type.created_at(),
        };
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(service_types::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        RepositoryError::Duplicate {
                            entity: EntityKind::ServiceType,
                            id: row.id,
                        }
                    }
                    other => map_diesel_error(other),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        organization_id: OrganizationId,
        id: ServiceTypeId,
    ) -> RepositoryResult<Option<ServiceType>> {
        run_blocking(&self.pool, move |connection| {
            let row = service_types::table
                .filter(service_types::id.eq(id.into_inner()))
                .filter(service_types::organization_id.eq(organization_id.into_inner()))
                .select(ServiceTypeRow::as_select())
                .first::<ServiceTypeRow>(connection)
                .optional()
                .map_err(map_diesel_error)?;
            Ok(row.map(row_to_service_type))
        })
        .await
    }

    async fn find_by_name(
        &self,
        organization_id: OrganizationId,
        name: &str,
    ) -> RepositoryResult<Option<ServiceType>> {
        let term = name.trim().to_owned();
        if term.is_empty() {
            return Ok(None);
        }
        run_blocking(&self.pool, move |connection| {
            let candidates: Vec<ServiceType> = service_types::table
                .filter(service_types::organization_id.eq(organization_id.into_inner()))
                .filter(service_types::name.ilike(contains_pattern(&term)))
                .order(service_types::name.asc())
                .select(ServiceTypeRow::as_select())
                .load::<ServiceTypeRow>(connection)
                .map_err(map_diesel_error)?
                .into_iter()
                .map(row_to_service_type)
                .collect();
            Ok(best_match(&candidates, &term).cloned())
        })
        .await
    }

    async fn list(&self, organization_id: OrganizationId) -> RepositoryResult<Vec<ServiceType>> {
        run_blocking(&self.pool, move |connection| {
            let rows = service_types::table
                .filter(service_types::organization_id.eq(organization_id.into_inner()))
                .order(service_types::name.asc())
                .select(ServiceTypeRow::as_select())
                .load::<ServiceTypeRow>(connection)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(row_to_service_type).collect())
        })
        .await
    }
}

fn row_to_service_type(row: ServiceTypeRow) -> ServiceType {
    ServiceType::from_persisted(
        ServiceTypeId::from_uuid(row.id),
        OrganizationId::from_uuid(row.organization_id),
        row.name,
        row.description,
        row.created_at,
    )
}
