//! `PostgreSQL` organization directory.

use super::{
    models::{NewOrganizationRow, OrganizationRow},
    schema::organizations,
};
use crate::organization::{Organization, OrganizationDirectory, OrganizationId};
use crate::persistence::postgres::{FieldlinePgPool, map_diesel_error, run_blocking};
use crate::persistence::{EntityKind, RepositoryError, RepositoryResult};
use crate::validation::OrganizationSlug;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed organization directory.
#[derive(Debug, Clone)]
pub struct PostgresOrganizationDirectory {
    pool: FieldlinePgPool,
}

impl PostgresOrganizationDirectory {
    /// Creates a directory from a connection pool.
    #[must_use]
    pub const fn new(pool: FieldlinePgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationDirectory for PostgresOrganizationDirectory {
    async fn store(&self, organization: &Organization) -> RepositoryResult<()> {
        let row = NewOrganizationRow {
            id: organization.id().into_inner(),
            slug: organization.slug().as_str().to_owned(),
            name: organization.name().to_owned(),
            created_at: organization.created_at(),
        };
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(organizations::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        RepositoryError::Duplicate {
                            entity: EntityKind::Organization,
                            id: row.id,
                        }
                    }
                    other => map_diesel_error(other),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: OrganizationId) -> RepositoryResult<Option<Organization>> {
        run_blocking(&self.pool, move |connection| {
            organizations::table
                .filter(organizations::id.eq(id.into_inner()))
                .select(OrganizationRow::as_select())
                .first::<OrganizationRow>(connection)
                .optional()
                .map_err(map_diesel_error)?
                .map(row_to_organization)
                .transpose()
        })
        .await
    }

    async fn find_by_slug(
        &self,
        slug: &OrganizationSlug,
    ) -> RepositoryResult<Option<Organization>> {
        let lookup = slug.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            organizations::table
                .filter(organizations::slug.eq(lookup))
                .select(OrganizationRow::as_select())
                .first::<OrganizationRow>(connection)
                .optional()
                .map_err(map_diesel_error)?
                .map(row_to_organization)
                .transpose()
        })
        .await
    }
}

fn row_to_organization(row: OrganizationRow) -> RepositoryResult<Organization> {
    let slug = OrganizationSlug::parse(&row.slug).map_err(RepositoryError::persistence)?;
    Ok(Organization::from_persisted(
        OrganizationId::from_uuid(row.id),
        slug,
        row.name,
        row.created_at,
    ))
}
