//! Handlers for the asset listing lifecycle.
//!
//! Public reads accept an optional bearer token; everything that writes
//! requires one. Ownership and status rules are enforced by
//! [`AssetOrchestrator`](crate::orchestrator::AssetOrchestrator).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use marketplace_core::types::DbId;
use marketplace_db::models::asset::{AssetFilter, CreateAsset, CreateMedia, UpdateAsset};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/assets
///
/// Paged listing. Anonymous callers and non-owners only see published
/// assets.
pub async fn list_assets(
    auth: MaybeAuthUser,
    State(state): State<AppState>,
    Query(filter): Query<AssetFilter>,
) -> AppResult<impl IntoResponse> {
    let actor = auth.actor();
    let page = state
        .orchestrator
        .list_assets(&filter, actor.as_ref())
        .await?;

    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/assets/{id_or_slug}
///
/// Asset detail with performance, verification flags, and media. Assets the
/// caller may not see are reported as not found.
pub async fn get_asset(
    auth: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let actor = auth.actor();
    let detail = state
        .orchestrator
        .get_asset_detail(&id_or_slug, actor.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Asset '{id_or_slug}' not found")))?;

    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// POST /api/v1/assets
pub async fn create_asset(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateAsset>,
) -> AppResult<impl IntoResponse> {
    let asset = state
        .orchestrator
        .create_asset(input, &auth.actor())
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// PATCH /api/v1/assets/{id}
pub async fn update_asset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<UpdateAsset>,
) -> AppResult<impl IntoResponse> {
    let asset = state
        .orchestrator
        .update_asset(id, patch, &auth.actor())
        .await?;

    Ok(Json(DataResponse { data: asset }))
}

/// DELETE /api/v1/assets/{id}
pub async fn delete_asset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.orchestrator.delete_asset(id, &auth.actor()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/assets/{id}/submit
///
/// Owner hands a draft to moderation.
pub async fn submit_asset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = state.orchestrator.submit_asset(id, &auth.actor()).await?;
    Ok(Json(DataResponse { data: asset }))
}

/// POST /api/v1/assets/{id}/revalidate
pub async fn revalidate_asset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = state
        .orchestrator
        .revalidate_asset(id, &auth.actor())
        .await?;

    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

/// POST /api/v1/assets/{id}/media
pub async fn add_media(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateMedia>,
) -> AppResult<impl IntoResponse> {
    let media = state
        .orchestrator
        .add_media(id, input, &auth.actor())
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: media })))
}

/// DELETE /api/v1/assets/{id}/media/{media_id}
pub async fn remove_media(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, media_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    state
        .orchestrator
        .remove_media(id, media_id, &auth.actor())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
