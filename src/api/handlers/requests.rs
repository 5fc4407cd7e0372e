//! Service request endpoints.

use crate::api::{
    AppState, HttpError,
    dto::{ApiResponse, CreateRequestDto, RequestListParams, UpdateStatusDto, parse_id},
};
use crate::request::{domain::ServiceRequestId, services::TransitionCommand};
use axum::{
    Extension, Json, Router,
    extract::{
        Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;
use std::sync::Arc;

/// Routes mounted under `/api/organizations/:organization_id/requests`.
pub fn requests_handler() -> Router {
    Router::new()
        .route("/", post(create_request).get(list_requests))
        .route("/summary", get(status_summary))
        .route("/status", put(update_request_status))
        .route("/:id", get(get_request).delete(delete_request))
        .route("/:id/transitions", get(allowed_transitions))
}

/// Opens a request on behalf of staff.
pub async fn create_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(organization): Path<String>,
    body: Result<Json<CreateRequestDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let organization_id = app_state.resolve_organization(&organization).await?;
    let Json(dto) = body?;

    let request = app_state
        .requests
        .create_request(organization_id, dto.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Service request created", request)),
    ))
}

/// Lists live requests with filters and paging.
pub async fn list_requests(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(organization): Path<String>,
    params: Result<Query<RequestListParams>, QueryRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let organization_id = app_state.resolve_organization(&organization).await?;
    let Query(params) = params?;
    let query = params.into_query()?;

    let requests = app_state.requests.list(organization_id, &query).await?;
    let total = app_state
        .requests
        .count(organization_id, &query.filter)
        .await?;
    Ok(Json(ApiResponse::success(
        "Service requests retrieved",
        json!({
            "requests": requests,
            "total": total,
            "offset": query.page.offset(),
            "limit": query.page.limit(),
        }),
    )))
}

/// Per-status counts for dashboards.
pub async fn status_summary(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(organization): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let organization_id = app_state.resolve_organization(&organization).await?;
    let summary = app_state.requests.status_summary(organization_id).await?;
    Ok(Json(ApiResponse::success(
        "Status summary retrieved",
        json!({ "counts": summary, "total": summary.total() }),
    )))
}

/// Fetches one request, soft-deleted ones included.
pub async fn get_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Path((organization, request)): Path<(String, String)>,
) -> Result<impl IntoResponse, HttpError> {
    let organization_id = app_state.resolve_organization(&organization).await?;
    let request_id = ServiceRequestId::from_uuid(parse_id(&request)?);

    let request = app_state.requests.find(organization_id, request_id).await?;
    Ok(Json(ApiResponse::success("Service request retrieved", request)))
}

/// Lists the statuses the request may move to next.
pub async fn allowed_transitions(
    Extension(app_state): Extension<Arc<AppState>>,
    Path((organization, request)): Path<(String, String)>,
) -> Result<impl IntoResponse, HttpError> {
    let organization_id = app_state.resolve_organization(&organization).await?;
    let request_id = ServiceRequestId::from_uuid(parse_id(&request)?);

    let allowed = app_state
        .requests
        .allowed_transitions(organization_id, request_id)
        .await?;
    Ok(Json(ApiResponse::success(
        "Allowed transitions retrieved",
        allowed,
    )))
}

/// Moves a request to a new status. Assignment changes ride along in the
/// same call and are validated by the lifecycle engine, never written
/// directly.
pub async fn update_request_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(organization): Path<String>,
    body: Result<Json<UpdateStatusDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let organization_id = app_state.resolve_organization(&organization).await?;
    let Json(dto) = body?;
    let command = TransitionCommand::parse(
        &dto.id,
        &dto.status,
        dto.assigned_provider_id
            .as_ref()
            .map(|field| field.as_deref()),
    )?;

    let request = app_state
        .requests
        .transition(organization_id, command)
        .await?;
    Ok(Json(ApiResponse::success("Service request updated", request)))
}

/// Soft-deletes a request.
pub async fn delete_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Path((organization, request)): Path<(String, String)>,
) -> Result<impl IntoResponse, HttpError> {
    let organization_id = app_state.resolve_organization(&organization).await?;
    let request_id = ServiceRequestId::from_uuid(parse_id(&request)?);

    let request = app_state
        .requests
        .soft_delete(organization_id, request_id)
        .await?;
    Ok(Json(ApiResponse::success("Service request deleted", request)))
}
