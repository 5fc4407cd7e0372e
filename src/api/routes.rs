//! Router assembly.

use super::{
    AppState,
    handlers::{providers_handler, requests_handler, webhook_handler},
};
use axum::{Extension, Json, Router, routing::get};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[expect(clippy::unused_async, reason = "axum handlers must be async")]
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Fieldline is running"
    }))
}

/// Builds the full application router over `app_state`.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let tenant_routes = Router::new()
        .nest("/requests", requests_handler())
        .nest("/providers", providers_handler());

    let api_route = Router::new()
        .nest("/webhooks", webhook_handler())
        .nest("/organizations/:organization_id", tenant_routes);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state))
}
