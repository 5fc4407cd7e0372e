//! Provider and skill adapter behaviour against `PostgreSQL`.

use crate::postgres::helpers::{PgContext, pg_context};
use fieldline::organization::OrganizationId;
use fieldline::persistence::{EntityKind, RepositoryError, RowVersion};
use fieldline::provider::{
    domain::{
        ProficiencyLevel, ProviderDetails, ProviderSkill, ProviderStatus, Rating, ServiceProvider,
    },
    ports::{ProviderQuery, ProviderRepository, ProviderSkillRepository},
};
use fieldline::service_type::{ServiceType, ServiceTypeRepository};
use fieldline::validation::PersonName;
use mockable::{Clock, DefaultClock};
use rstest::rstest;

fn stored(context: &PgContext, provider: &ServiceProvider) -> ServiceProvider {
    context
        .rt
        .block_on(
            context
                .state
                .repositories
                .providers
                .find_by_id(provider.organization_id(), provider.id()),
        )
        .expect("lookup succeeds")
        .expect("provider exists")
}

#[rstest]
fn version_guard_rejects_stale_writes(pg_context: PgContext) {
    let context = pg_context;
    let provider = context.provider("Pat Fixit");
    let repo = &context.state.repositories.providers;

    let mut inactive = provider.clone();
    inactive
        .update_status(ProviderStatus::Inactive, &DefaultClock)
        .expect("roster status");
    context
        .rt
        .block_on(repo.update(&inactive, RowVersion::INITIAL))
        .expect("first write wins");

    let mut stale = provider.clone();
    stale.mark_deleted(&DefaultClock);
    let result = context
        .rt
        .block_on(repo.update(&stale, RowVersion::INITIAL));

    assert!(matches!(
        result,
        Err(RepositoryError::ConcurrentModification {
            entity: EntityKind::Provider,
            ..
        })
    ));
    let current = stored(&context, &provider);
    assert!(!current.is_deleted());
    assert_eq!(current.status(), ProviderStatus::Inactive);
    assert_eq!(current.version(), RowVersion::INITIAL.next());
}

#[rstest]
fn update_of_unknown_or_foreign_provider_is_not_found(pg_context: PgContext) {
    let context = pg_context;
    let provider = context.provider("Pat Fixit");
    let repo = &context.state.repositories.providers;
    let stranger = ServiceProvider::new(
        OrganizationId::new(),
        ProviderDetails {
            name: PersonName::parse("Sam Stranger").expect("valid name"),
            email: None,
            phone: None,
            rating: Rating::default(),
            status: ProviderStatus::Active,
        },
        &DefaultClock,
    );

    let unknown = context
        .rt
        .block_on(repo.update(&stranger, RowVersion::INITIAL));

    assert!(matches!(
        unknown,
        Err(RepositoryError::NotFound {
            entity: EntityKind::Provider,
            ..
        })
    ));
    assert_eq!(stored(&context, &provider).version(), RowVersion::INITIAL);
}

#[rstest]
fn soft_deleted_providers_leave_listings_but_stay_readable(pg_context: PgContext) {
    let context = pg_context;
    let kept = context.provider("Alex Kept");
    let removed = context.provider("Robin Removed");

    let deletion = context
        .rt
        .block_on(
            context
                .state
                .providers
                .soft_delete_provider(context.organization_id, removed.id()),
        )
        .expect("deletion succeeds");
    let listed = context
        .rt
        .block_on(
            context
                .state
                .repositories
                .providers
                .list(context.organization_id, &ProviderQuery::default()),
        )
        .expect("listing succeeds");

    assert!(deletion.provider.is_deleted());
    assert_eq!(
        listed.iter().map(ServiceProvider::id).collect::<Vec<_>>(),
        vec![kept.id()]
    );
    let archived = stored(&context, &removed);
    assert!(archived.deleted_at().is_some());
    assert_eq!(archived.version(), RowVersion::INITIAL.next());
}

#[rstest]
fn repeated_skill_rows_are_ignored(pg_context: PgContext) {
    let context = pg_context;
    let provider = context.provider("Pat Fixit");
    let plumbing = ServiceType::new(context.organization_id, "Plumbing", None, &DefaultClock);
    context
        .rt
        .block_on(context.state.repositories.service_types.store(&plumbing))
        .expect("service type stored");
    let skill = ProviderSkill::new(
        provider.id(),
        plumbing.id(),
        ProficiencyLevel::default(),
        DefaultClock.utc(),
    );
    let skills = &context.state.repositories.skills;

    context
        .rt
        .block_on(skills.insert(std::slice::from_ref(&skill)))
        .expect("first insert");
    context
        .rt
        .block_on(skills.insert(&[skill.clone(), skill.clone()]))
        .expect("duplicate rows are skipped");
    let listed = context
        .rt
        .block_on(skills.list_for_provider(provider.id()))
        .expect("listing succeeds");

    assert_eq!(listed.len(), 1);
    assert_eq!(
        context
            .rt
            .block_on(skills.delete_for_provider(provider.id()))
            .expect("delete succeeds"),
        1
    );
}
