//! `PostgreSQL` repository implementation for service requests.

use super::{
    models::{NewServiceRequestRow, ServiceRequestChangeset, ServiceRequestRow},
    schema::service_requests,
};
use crate::organization::OrganizationId;
use crate::persistence::postgres::{
    FieldlinePgPool, contains_pattern, map_diesel_error, run_blocking, to_signed, to_unsigned,
};
use crate::persistence::{
    EntityKind, RepositoryError, RepositoryResult, RowVersion, SortOrder,
};
use crate::provider::domain::ProviderId;
use crate::request::domain::{
    CustomerContact, PersistedRequestData, Priority, RequestStatus, ServiceRequest,
    ServiceRequestId,
};
use crate::request::ports::{RequestFilter, RequestQuery, ServiceRequestRepository};
use crate::service_type::ServiceTypeId;
use crate::validation::{
    EmailAddress, PersonName, PhoneNumber, ProblemDescription, SourceLabel, StreetAddress,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

/// `PostgreSQL`-backed service request repository.
#[derive(Debug, Clone)]
pub struct PostgresServiceRequestRepository {
    pool: FieldlinePgPool,
}

impl PostgresServiceRequestRepository {
    /// Creates a repository from a connection pool.
    #[must_use]
    pub const fn new(pool: FieldlinePgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRequestRepository for PostgresServiceRequestRepository {
    async fn store(&self, request: &ServiceRequest) -> RepositoryResult<()> {
        let row = to_new_row(request)?;
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(service_requests::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        RepositoryError::Duplicate {
                            entity: EntityKind::ServiceRequest,
                            id: row.id,
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
        request: &ServiceRequest,
        expected: RowVersion,
    ) -> RepositoryResult<()> {
        let id = request.id().into_inner();
        let organization_id = request.organization_id().into_inner();
        let expected_version = to_signed(expected.value())?;
        let changes = ServiceRequestChangeset {
            assigned_provider_id: request.assigned_provider_id().map(ProviderId::into_inner),
            status: request.status().as_str().to_owned(),
            version: to_signed(request.version().value())?,
            updated_at: request.updated_at(),
            completed_at: request.completed_at(),
            deleted_at: request.deleted_at(),
        };

        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(
                service_requests::table
                    .filter(service_requests::id.eq(id))
                    .filter(service_requests::organization_id.eq(organization_id))
                    .filter(service_requests::version.eq(expected_version)),
            )
            .set(&changes)
            .execute(connection)
            .map_err(map_diesel_error)?;
            if affected > 0 {
                return Ok(());
            }

            let exists = diesel::select(diesel::dsl::exists(
                service_requests::table
                    .filter(service_requests::id.eq(id))
                    .filter(service_requests::organization_id.eq(organization_id)),
            ))
            .get_result::<bool>(connection)
            .map_err(map_diesel_error)?;
            if exists {
                Err(RepositoryError::concurrent_modification(
                    EntityKind::ServiceRequest,
                    ServiceRequestId::from_uuid(id),
                ))
            } else {
                Err(RepositoryError::not_found(
                    EntityKind::ServiceRequest,
                    ServiceRequestId::from_uuid(id),
                ))
            }
        })
        .await
    }

    async fn find_by_id(
        &self,
        organization_id: OrganizationId,
        id: ServiceRequestId,
    ) -> RepositoryResult<Option<ServiceRequest>> {
        run_blocking(&self.pool, move |connection| {
            service_requests::table
                .filter(service_requests::id.eq(id.into_inner()))
                .filter(service_requests::organization_id.eq(organization_id.into_inner()))
                .select(ServiceRequestRow::as_select())
                .first::<ServiceRequestRow>(connection)
                .optional()
                .map_err(map_diesel_error)?
                .map(row_to_request)
                .transpose()
        })
        .await
    }

    async fn list(
        &self,
        organization_id: OrganizationId,
        query: &RequestQuery,
    ) -> RepositoryResult<Vec<ServiceRequest>> {
        let filter = query.filter.clone();
        let order = query.order;
        let offset = to_signed(query.page.offset())?;
        let limit = to_signed(query.page.limit())?;
        run_blocking(&self.pool, move |connection| {
            let base = live_requests(organization_id, &filter);
            let ordered = match order {
                SortOrder::Ascending => base.order((
                    service_requests::created_at.asc(),
                    service_requests::id.asc(),
                )),
                SortOrder::Descending => base.order((
                    service_requests::created_at.desc(),
                    service_requests::id.desc(),
                )),
            };
            let rows = ordered
                .offset(offset)
                .limit(limit)
                .select(ServiceRequestRow::as_select())
                .load::<ServiceRequestRow>(connection)
                .map_err(map_diesel_error)?;
            rows.into_iter().map(row_to_request).collect()
        })
        .await
    }

    async fn count(
        &self,
        organization_id: OrganizationId,
        filter: &RequestFilter,
    ) -> RepositoryResult<u64> {
        let criteria = filter.clone();
        run_blocking(&self.pool, move |connection| {
            let total = live_requests(organization_id, &criteria)
                .count()
                .get_result::<i64>(connection)
                .map_err(map_diesel_error)?;
            to_unsigned(total)
        })
        .await
    }

    async fn count_by_status(
        &self,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Vec<(RequestStatus, u64)>> {
        run_blocking(&self.pool, move |connection| {
            let rows = service_requests::table
                .filter(service_requests::organization_id.eq(organization_id.into_inner()))
                .filter(service_requests::deleted_at.is_null())
                .group_by(service_requests::status)
                .select((service_requests::status, count_star()))
                .load::<(String, i64)>(connection)
                .map_err(map_diesel_error)?;
            rows.into_iter()
                .map(|(status, total)| {
                    let parsed = RequestStatus::try_from(status.as_str())
                        .map_err(RepositoryError::persistence)?;
                    Ok((parsed, to_unsigned(total)?))
                })
                .collect()
        })
        .await
    }

    async fn clear_provider_assignments(
        &self,
        organization_id: OrganizationId,
        provider_id: ProviderId,
        at: DateTime<Utc>,
    ) -> RepositoryResult<u64> {
        run_blocking(&self.pool, move |connection| {
            let cleared = diesel::update(
                service_requests::table
                    .filter(service_requests::organization_id.eq(organization_id.into_inner()))
                    .filter(service_requests::assigned_provider_id.eq(provider_id.into_inner())),
            )
            .set((
                service_requests::assigned_provider_id.eq(None::<Uuid>),
                service_requests::updated_at.eq(at),
                service_requests::version.eq(service_requests::version + 1_i64),
            ))
            .execute(connection)
            .map_err(map_diesel_error)?;
            u64::try_from(cleared).map_err(RepositoryError::persistence)
        })
        .await
    }

    async fn count_assigned_to(
        &self,
        organization_id: OrganizationId,
        provider_id: ProviderId,
    ) -> RepositoryResult<u64> {
        run_blocking(&self.pool, move |connection| {
            let total = service_requests::table
                .filter(service_requests::organization_id.eq(organization_id.into_inner()))
                .filter(service_requests::assigned_provider_id.eq(provider_id.into_inner()))
                .count()
                .get_result::<i64>(connection)
                .map_err(map_diesel_error)?;
            to_unsigned(total)
        })
        .await
    }
}

fn live_requests(
    organization_id: OrganizationId,
    filter: &RequestFilter,
) -> service_requests::BoxedQuery<'static, Pg> {
    let mut query = service_requests::table
        .filter(service_requests::organization_id.eq(organization_id.into_inner()))
        .filter(service_requests::deleted_at.is_null())
        .into_boxed();
    if let Some(status) = filter.status {
        query = query.filter(service_requests::status.eq(status.as_str()));
    }
    if let Some(provider_id) = filter.assigned_provider_id {
        query = query.filter(service_requests::assigned_provider_id.eq(provider_id.into_inner()));
    }
    if let Some(priority) = filter.priority {
        query = query.filter(service_requests::priority.eq(priority.as_str()));
    }
    if let Some(term) = filter.search.as_deref() {
        query = query.filter(service_requests::customer_name.ilike(contains_pattern(term)));
    }
    query
}

fn to_new_row(request: &ServiceRequest) -> RepositoryResult<NewServiceRequestRow> {
    let customer = request.customer();
    Ok(NewServiceRequestRow {
        id: request.id().into_inner(),
        organization_id: request.organization_id().into_inner(),
        customer_name: customer.name.as_str().to_owned(),
        customer_email: customer.email.as_ref().map(|email| email.as_str().to_owned()),
        customer_phone: customer.phone.as_ref().map(|phone| phone.as_str().to_owned()),
        address: request.address().as_str().to_owned(),
        problem_description: request.problem_description().as_str().to_owned(),
        service_type_id: request.service_type_id().map(ServiceTypeId::into_inner),
        priority: request.priority().as_str().to_owned(),
        source: request.source().map(|source| source.as_str().to_owned()),
        assigned_provider_id: request.assigned_provider_id().map(ProviderId::into_inner),
        status: request.status().as_str().to_owned(),
        version: to_signed(request.version().value())?,
        created_at: request.created_at(),
        updated_at: request.updated_at(),
        completed_at: request.completed_at(),
        deleted_at: request.deleted_at(),
    })
}

fn row_to_request(row: ServiceRequestRow) -> RepositoryResult<ServiceRequest> {
    let customer = CustomerContact {
        name: PersonName::parse(&row.customer_name).map_err(RepositoryError::persistence)?,
        email: EmailAddress::parse(row.customer_email.as_deref())
            .map_err(RepositoryError::persistence)?,
        phone: PhoneNumber::parse(row.customer_phone.as_deref())
            .map_err(RepositoryError::persistence)?,
    };
    let data = PersistedRequestData {
        id: ServiceRequestId::from_uuid(row.id),
        organization_id: OrganizationId::from_uuid(row.organization_id),
        customer,
        address: StreetAddress::parse(&row.address).map_err(RepositoryError::persistence)?,
        problem_description: ProblemDescription::parse(&row.problem_description)
            .map_err(RepositoryError::persistence)?,
        service_type_id: row.service_type_id.map(ServiceTypeId::from_uuid),
        priority: Priority::try_from(row.priority.as_str())
            .map_err(RepositoryError::persistence)?,
        source: SourceLabel::parse(row.source.as_deref()).map_err(RepositoryError::persistence)?,
        assigned_provider_id: row.assigned_provider_id.map(ProviderId::from_uuid),
        status: RequestStatus::try_from(row.status.as_str())
            .map_err(RepositoryError::persistence)?,
        version: RowVersion::new(to_unsigned(row.version)?),
        created_at: row.created_at,
        updated_at: row.updated_at,
        completed_at: row.completed_at,
        deleted_at: row.deleted_at,
    };
    Ok(ServiceRequest::from_persisted(data))
}
