//! Shared helpers for `PostgreSQL` adapter tests.

pub use super::cluster::{BoxError, PostgresCluster, postgres_cluster};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use fieldline::api::{AppState, Repositories};
use fieldline::organization::{Organization, OrganizationDirectory, OrganizationId};
use fieldline::persistence::PersistencePolicy;
use fieldline::persistence::postgres::{FieldlinePgPool, build_pool};
use fieldline::provider::{domain::ServiceProvider, services::RegisterProvider};
use fieldline::request::{domain::ServiceRequest, services::CreateServiceRequest};
use fieldline::validation::OrganizationSlug;
use mockable::DefaultClock;
use rstest::fixture;
use std::time::Duration;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Schema applied to the template database.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_fieldline/up.sql");

/// Template database holding the migrated schema.
pub const TEMPLATE_DB: &str = "fieldline_test_template";

/// Builds the runtime the blocking tests drive adapters with.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
pub fn test_runtime() -> Result<Runtime, BoxError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| Box::new(err) as BoxError)
}

fn apply_migrations(url: &str) -> Result<(), BoxError> {
    let mut conn = PgConnection::establish(url).map_err(|err| Box::new(err) as BoxError)?;
    conn.batch_execute(CREATE_SCHEMA_SQL)
        .map_err(|err| Box::new(err) as BoxError)
}

/// Per-test database cloned from the template; dropped on cleanup.
pub struct TestDatabase {
    cluster: PostgresCluster,
    name: String,
}

impl TestDatabase {
    fn create(cluster: PostgresCluster) -> Result<Self, BoxError> {
        cluster.ensure_template_exists(TEMPLATE_DB, apply_migrations)?;
        let name = format!("test_{}", Uuid::new_v4().simple());
        cluster.create_database_from_template(&name, TEMPLATE_DB)?;
        Ok(Self { cluster, name })
    }

    /// Connection URL of this database.
    #[must_use]
    pub fn url(&self) -> String {
        self.cluster.database_url(&self.name)
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        drop(self.cluster.drop_database(&self.name));
    }
}

/// Services and repositories over a fresh database with one organization.
///
/// Field order matters: the state and its pool close their connections
/// before the database is dropped.
pub struct PgContext {
    pub state: AppState,
    pub pool: FieldlinePgPool,
    pub organization_id: OrganizationId,
    pub rt: Runtime,
    _database: TestDatabase,
}

#[fixture]
pub fn pg_context(postgres_cluster: PostgresCluster) -> PgContext {
    let database = TestDatabase::create(postgres_cluster).expect("test database");
    let pool = build_pool(&database.url(), 4, Duration::from_secs(5)).expect("pool");
    let state = AppState::new(Repositories::postgres(&pool), PersistencePolicy::default());
    let rt = test_runtime().expect("tokio runtime");
    let slug = OrganizationSlug::parse("acme-plumbing").expect("valid slug");
    let organization = Organization::new(slug, "Acme Plumbing", &DefaultClock);
    rt.block_on(state.repositories.organizations.store(&organization))
        .expect("seed organization");
    PgContext {
        state,
        pool,
        organization_id: organization.id(),
        rt,
        _database: database,
    }
}

impl PgContext {
    /// Registers a provider through the service.
    pub fn provider(&self, name: &str) -> ServiceProvider {
        self.rt
            .block_on(
                self.state
                    .providers
                    .register_provider(self.organization_id, RegisterProvider::new(name)),
            )
            .expect("provider registered")
    }

    /// Opens a request, optionally assigned to `provider`.
    pub fn request(&self, provider: Option<&ServiceProvider>) -> ServiceRequest {
        let mut input = CreateServiceRequest::new(
            "Jane Doe",
            "12 Harbour Street",
            "Water heater leaking in the basement",
        );
        if let Some(assigned) = provider {
            input = input.with_provider_id(assigned.id().to_string());
        }
        self.rt
            .block_on(self.state.requests.create_request(self.organization_id, input))
            .expect("request created")
    }
}
