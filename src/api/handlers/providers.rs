//! Provider endpoints.

use crate::api::{
    AppState, HttpError,
    dto::{
        ApiResponse, DeleteProviderDto, ProviderDeletionView, ProviderListParams,
        ProviderStatusDto, RegisterProviderDto, ReplaceSkillsDto, parse_id,
    },
};
use crate::provider::domain::ProviderId;
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
use std::sync::Arc;

/// Routes mounted under `/api/organizations/:organization_id/providers`.
pub fn providers_handler() -> Router {
    Router::new()
        .route("/", post(register_provider).get(list_providers))
        .route("/delete", post(delete_provider))
        .route("/:id", get(get_provider))
        .route("/:id/status", put(update_provider_status))
        .route("/:id/skills", put(replace_skills).get(list_skills))
}

/// Registers a provider.
pub async fn register_provider(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(organization): Path<String>,
    body: Result<Json<RegisterProviderDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let organization_id = app_state.resolve_organization(&organization).await?;
    let Json(dto) = body?;

    let provider = app_state
        .providers
        .register_provider(organization_id, dto.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Provider registered", provider)),
    ))
}

/// Lists live providers.
pub async fn list_providers(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(organization): Path<String>,
    params: Result<Query<ProviderListParams>, QueryRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let organization_id = app_state.resolve_organization(&organization).await?;
    let Query(params) = params?;
    let query = params.into_query()?;

    let providers = app_state
        .providers
        .list_providers(organization_id, &query)
        .await?;
    Ok(Json(ApiResponse::success("Providers retrieved", providers)))
}

/// Fetches one provider, soft-deleted ones included.
pub async fn get_provider(
    Extension(app_state): Extension<Arc<AppState>>,
    Path((organization, provider)): Path<(String, String)>,
) -> Result<impl IntoResponse, HttpError> {
    let organization_id = app_state.resolve_organization(&organization).await?;
    let provider_id = ProviderId::from_uuid(parse_id(&provider)?);

    let found = app_state
        .providers
        .find_provider(organization_id, provider_id)
        .await?;
    Ok(Json(ApiResponse::success("Provider retrieved", found)))
}

/// Changes a provider's status within its vocabulary.
pub async fn update_provider_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Path((organization, provider)): Path<(String, String)>,
    body: Result<Json<ProviderStatusDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let organization_id = app_state.resolve_organization(&organization).await?;
    let provider_id = ProviderId::from_uuid(parse_id(&provider)?);
    let Json(dto) = body?;

    let updated = app_state
        .providers
        .update_provider_status(organization_id, provider_id, &dto.status)
        .await?;
    Ok(Json(ApiResponse::success("Provider status updated", updated)))
}

/// Replaces the provider's skill set with the supplied service types.
pub async fn replace_skills(
    Extension(app_state): Extension<Arc<AppState>>,
    Path((organization, provider)): Path<(String, String)>,
    body: Result<Json<ReplaceSkillsDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let organization_id = app_state.resolve_organization(&organization).await?;
    let provider_id = ProviderId::from_uuid(parse_id(&provider)?);
    let Json(dto) = body?;
    let service_type_ids = dto.parse_ids()?;

    let skills = app_state
        .providers
        .replace_skills(organization_id, provider_id, &service_type_ids)
        .await?;
    Ok(Json(ApiResponse::success("Provider skills replaced", skills)))
}

/// Lists the provider's skills.
pub async fn list_skills(
    Extension(app_state): Extension<Arc<AppState>>,
    Path((organization, provider)): Path<(String, String)>,
) -> Result<impl IntoResponse, HttpError> {
    let organization_id = app_state.resolve_organization(&organization).await?;
    let provider_id = ProviderId::from_uuid(parse_id(&provider)?);

    let skills = app_state
        .providers
        .skills(organization_id, provider_id)
        .await?;
    Ok(Json(ApiResponse::success("Provider skills retrieved", skills)))
}

/// Soft-deletes a provider after releasing every request assigned to it.
pub async fn delete_provider(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(organization): Path<String>,
    body: Result<Json<DeleteProviderDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let organization_id = app_state.resolve_organization(&organization).await?;
    let Json(dto) = body?;
    let provider_id = ProviderId::from_uuid(parse_id(&dto.id)?);

    let deletion = app_state
        .providers
        .soft_delete_provider(organization_id, provider_id)
        .await?;
    Ok(Json(ApiResponse::success(
        "Provider deleted",
        ProviderDeletionView::from(deletion),
    )))
}
