//! Admin-only handlers: moderation, publishing, status overrides, audit.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use marketplace_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::orchestrator::{ModerateRequest, StatusOverrideRequest};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/admin/assets/{id}/moderate
///
/// Approve or reject an asset that is pending review.
pub async fn moderate_asset(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(request): Json<ModerateRequest>,
) -> AppResult<impl IntoResponse> {
    let asset = state
        .orchestrator
        .moderate_asset(id, request, &admin.actor())
        .await?;

    Ok(Json(DataResponse { data: asset }))
}

/// POST /api/v1/admin/assets/{id}/publish
pub async fn publish_asset(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = state.orchestrator.publish_asset(id, &admin.actor()).await?;
    Ok(Json(DataResponse { data: asset }))
}

/// PUT /api/v1/admin/assets/{id}/status
///
/// Force a status, bypassing the workflow. Audited.
pub async fn override_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(request): Json<StatusOverrideRequest>,
) -> AppResult<impl IntoResponse> {
    let asset = state
        .orchestrator
        .override_status(id, request, &admin.actor())
        .await?;

    Ok(Json(DataResponse { data: asset }))
}

/// GET /api/v1/admin/assets/{id}/audit
pub async fn list_audit(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entries = state.orchestrator.list_audit(id, &admin.actor()).await?;
    Ok(Json(DataResponse { data: entries }))
}
