//! Service request adapter behaviour against `PostgreSQL`.

use crate::postgres::helpers::{PgContext, pg_context};
use fieldline::persistence::{EntityKind, RepositoryError, RowVersion};
use fieldline::request::{
    domain::{
        AssignmentChange, CustomerContact, Priority, RequestDetails, RequestStatus,
        ServiceRequest,
    },
    ports::{RequestFilter, RequestQuery, ServiceRequestRepository},
    services::TransitionCommand,
};
use fieldline::validation::{PersonName, ProblemDescription, StreetAddress};
use mockable::{Clock, DefaultClock};
use rstest::rstest;

#[derive(diesel::QueryableByName)]
struct VersionRow {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    version: i64,
}

fn raw_version(context: &PgContext, request: &ServiceRequest) -> i64 {
    use diesel::prelude::*;

    let mut conn = context.pool.get().expect("pooled connection");
    diesel::sql_query("SELECT version FROM service_requests WHERE id = $1")
        .bind::<diesel::sql_types::Uuid, _>(request.id().into_inner())
        .get_result::<VersionRow>(&mut *conn)
        .expect("version row")
        .version
}

fn stored(context: &PgContext, request: &ServiceRequest) -> ServiceRequest {
    context
        .rt
        .block_on(
            context
                .state
                .repositories
                .requests
                .find_by_id(request.organization_id(), request.id()),
        )
        .expect("lookup succeeds")
        .expect("request exists")
}

#[rstest]
fn stale_version_is_rejected_and_missing_row_is_not_found(pg_context: PgContext) {
    let context = pg_context;
    let request = context.request(None);
    let repo = &context.state.repositories.requests;
    let mut cancelled = request.clone();
    cancelled
        .transition_to(RequestStatus::Cancelled, AssignmentChange::Keep, &DefaultClock)
        .expect("pending may be cancelled");
    context
        .rt
        .block_on(repo.update(&cancelled, RowVersion::INITIAL))
        .expect("first write wins");

    let stale = context
        .rt
        .block_on(repo.update(&cancelled, RowVersion::INITIAL));
    let ghost = ServiceRequest::new(
        context.organization_id,
        RequestDetails {
            customer: CustomerContact {
                name: PersonName::parse("Jane Doe").expect("valid name"),
                email: None,
                phone: None,
            },
            address: StreetAddress::parse("12 Harbour Street").expect("valid address"),
            problem_description: ProblemDescription::parse("Water heater leaking in the basement")
                .expect("valid description"),
            service_type_id: None,
            priority: Priority::Normal,
            source: None,
            assigned_provider_id: None,
        },
        &DefaultClock,
    );
    let missing = context.rt.block_on(repo.update(&ghost, RowVersion::INITIAL));

    assert!(matches!(
        stale,
        Err(RepositoryError::ConcurrentModification {
            entity: EntityKind::ServiceRequest,
            ..
        })
    ));
    assert!(matches!(
        missing,
        Err(RepositoryError::NotFound {
            entity: EntityKind::ServiceRequest,
            ..
        })
    ));
    assert_eq!(raw_version(&context, &request), 2);
    assert_eq!(stored(&context, &request).status(), RequestStatus::Cancelled);
}

#[rstest]
fn orphaning_clears_every_assignment_and_bumps_versions(pg_context: PgContext) {
    let context = pg_context;
    let provider = context.provider("Pat Fixit");
    let live = context.request(Some(&provider));
    let archived = context.request(Some(&provider));
    context
        .rt
        .block_on(
            context
                .state
                .requests
                .soft_delete(context.organization_id, archived.id()),
        )
        .expect("request archived");
    let archived_version = raw_version(&context, &archived);
    let repo = &context.state.repositories.requests;

    let cleared = context
        .rt
        .block_on(repo.clear_provider_assignments(
            context.organization_id,
            provider.id(),
            DefaultClock.utc(),
        ))
        .expect("orphaning succeeds");
    let remaining = context
        .rt
        .block_on(repo.count_assigned_to(context.organization_id, provider.id()))
        .expect("count succeeds");

    assert_eq!(cleared, 2);
    assert_eq!(remaining, 0);
    assert_eq!(raw_version(&context, &live), 2);
    assert_eq!(raw_version(&context, &archived), archived_version + 1);
    let orphan = stored(&context, &live);
    assert!(orphan.assigned_provider_id().is_none());
    assert_eq!(orphan.status(), RequestStatus::Assigned);
}

#[rstest]
fn soft_deleted_requests_leave_list_and_count(pg_context: PgContext) {
    let context = pg_context;
    let kept = context.request(None);
    let removed = context.request(None);
    context
        .rt
        .block_on(
            context
                .state
                .requests
                .soft_delete(context.organization_id, removed.id()),
        )
        .expect("request archived");
    let repo = &context.state.repositories.requests;

    let listed = context
        .rt
        .block_on(repo.list(
            context.organization_id,
            &RequestQuery::new(RequestFilter::default()),
        ))
        .expect("listing succeeds");
    let counted = context
        .rt
        .block_on(repo.count(context.organization_id, &RequestFilter::default()))
        .expect("count succeeds");

    assert_eq!(
        listed.iter().map(ServiceRequest::id).collect::<Vec<_>>(),
        vec![kept.id()]
    );
    assert_eq!(counted, 1);
    assert!(stored(&context, &removed).is_deleted());
}

#[rstest]
fn deleting_a_provider_orphans_its_requests_end_to_end(pg_context: PgContext) {
    let context = pg_context;
    let provider = context.provider("Pat Fixit");
    let request = context.request(Some(&provider));
    context
        .rt
        .block_on(context.state.requests.transition(
            context.organization_id,
            TransitionCommand::new(request.id(), RequestStatus::InProgress, AssignmentChange::Keep),
        ))
        .expect("work started");

    let deletion = context
        .rt
        .block_on(
            context
                .state
                .providers
                .soft_delete_provider(context.organization_id, provider.id()),
        )
        .expect("deletion succeeds");

    assert_eq!(deletion.orphaned_requests, 1);
    let orphan = stored(&context, &request);
    assert!(orphan.assigned_provider_id().is_none());
    assert_eq!(orphan.status(), RequestStatus::InProgress);
    assert_eq!(orphan.version(), RowVersion::new(3));
}
