//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use eyre::WrapErr;
use fieldline::api::{AppState, Repositories, create_router};
use fieldline::organization::{Organization, OrganizationDirectory, OrganizationId};
use fieldline::persistence::PersistencePolicy;
use fieldline::provider::{domain::ProviderId, services::RegisterProvider};
use fieldline::request::services::CreateServiceRequest;
use fieldline::service_type::{ServiceType, ServiceTypeId, ServiceTypeRepository};
use fieldline::validation::OrganizationSlug;
use mockable::DefaultClock;
use serde_json::Value;
use tower::ServiceExt;

/// Slug of the organization every [`TestApp`] starts with.
pub const ORGANIZATION_SLUG: &str = "acme-plumbing";

/// An application over fresh in-memory adapters with one organization.
pub struct TestApp {
    /// Services and adapters behind the router.
    pub state: Arc<AppState>,
    /// Router under test.
    pub router: Router,
    /// The seeded organization.
    pub organization_id: OrganizationId,
}

/// Builds a fresh application over in-memory adapters.
///
/// # Errors
///
/// Returns an error if the organization cannot be seeded.
pub async fn test_app() -> eyre::Result<TestApp> {
    let state = Arc::new(AppState::new(
        Repositories::in_memory(),
        PersistencePolicy::default(),
    ));
    let organization_id = store_organization(&state, ORGANIZATION_SLUG).await?;
    Ok(TestApp {
        router: create_router(Arc::clone(&state)),
        organization_id,
        state,
    })
}

async fn store_organization(state: &AppState, slug: &str) -> eyre::Result<OrganizationId> {
    let parsed = OrganizationSlug::parse(slug).map_err(|err| eyre::eyre!("invalid slug: {err}"))?;
    let organization = Organization::new(parsed, "Acme Plumbing", &DefaultClock);
    state
        .repositories
        .organizations
        .store(&organization)
        .await
        .wrap_err("seed organization")?;
    Ok(organization.id())
}

impl TestApp {
    /// Sends a request and decodes the JSON reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the body is not
    /// JSON.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> eyre::Result<(StatusCode, Value)> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.map_or_else(Body::empty, |json| Body::from(json.to_string())))
            .wrap_err("build request")?;
        self.send_raw(request).await
    }

    /// Sends a prebuilt request and decodes the JSON reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not JSON.
    pub async fn send_raw(&self, request: Request<Body>) -> eyre::Result<(StatusCode, Value)> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .wrap_err("route request")?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .wrap_err("read body")?;
        let decoded = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).wrap_err("decode body")?
        };
        Ok((status, decoded))
    }

    /// Stores another organization alongside the seeded one.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is invalid or the store fails.
    pub async fn add_organization(&self, slug: &str) -> eyre::Result<OrganizationId> {
        store_organization(&self.state, slug).await
    }

    /// Builds a route under the seeded organization.
    #[must_use]
    pub fn tenant(&self, path: &str) -> String {
        format!("/api/organizations/{}{path}", self.organization_id)
    }

    /// Registers a provider through the service layer.
    ///
    /// # Errors
    ///
    /// Returns an error if registration fails.
    pub async fn provider(&self, name: &str) -> eyre::Result<ProviderId> {
        let provider = self
            .state
            .providers
            .register_provider(self.organization_id, RegisterProvider::new(name))
            .await?;
        Ok(provider.id())
    }

    /// Adds a service type to the catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn service_type(&self, name: &str) -> eyre::Result<ServiceTypeId> {
        let service_type = ServiceType::new(self.organization_id, name, None, &DefaultClock);
        self.state
            .repositories
            .service_types
            .store(&service_type)
            .await?;
        Ok(service_type.id())
    }
}

/// A valid request body for the customer `name`.
#[must_use]
pub fn leaking_heater(name: &str) -> CreateServiceRequest {
    CreateServiceRequest::new(
        name,
        "12 Harbour Street",
        "Water heater leaking in the basement",
    )
}
