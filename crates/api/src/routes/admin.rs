//! Route definitions for `/admin/assets`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin/assets`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// POST   /{id}/moderate  -> moderate_asset
/// POST   /{id}/publish   -> publish_asset
/// PUT    /{id}/status    -> override_status
/// GET    /{id}/audit     -> list_audit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/moderate", post(admin::moderate_asset))
        .route("/{id}/publish", post(admin::publish_asset))
        .route("/{id}/status", put(admin::override_status))
        .route("/{id}/audit", get(admin::list_audit))
}
