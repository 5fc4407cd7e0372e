//! Inbound service request webhook.

use crate::api::{AppState, HttpError};
use crate::error::ErrorKind;
use crate::request::services::{IntakeError, IntakeSubmission};
use axum::{
    Extension, Json, Router, extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse, routing::post,
};
use std::sync::Arc;

/// Routes mounted under `/api/webhooks`.
pub fn webhook_handler() -> Router {
    Router::new().route("/service-requests", post(receive_service_request))
}

/// Accepts a submission from an external form or integration.
///
/// Every rejection, whether a malformed body, an invalid field or an unknown
/// organization, produces the same body so callers cannot enumerate tenants.
pub async fn receive_service_request(
    Extension(app_state): Extension<Arc<AppState>>,
    payload: Result<Json<IntakeSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(submission) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "webhook body rejected");
        HttpError::invalid_request()
    })?;

    let receipt = app_state
        .intake
        .submit(submission)
        .await
        .map_err(|err| rejection_response(&err))?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

fn rejection_response(err: &IntakeError) -> HttpError {
    if err.is_rejection() {
        tracing::info!(error = %err, "webhook submission rejected");
        return HttpError::invalid_request();
    }
    match err.kind() {
        ErrorKind::Transient => {
            tracing::warn!(error = %err, "webhook intake unavailable");
            HttpError::service_unavailable()
        }
        _ => {
            tracing::error!(error = %err, "webhook intake failed");
            HttpError::server_error()
        }
    }
}
