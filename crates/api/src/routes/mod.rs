pub mod admin;
pub mod assets;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /assets                                  list, create
/// /assets/{id}                             get (id or slug), update, delete
/// /assets/{id}/submit                      submit for review (owner)
/// /assets/{id}/revalidate                  recompute valuation and flags
/// /assets/{id}/media                       attach media
/// /assets/{id}/media/{media_id}            remove media
///
/// /admin/assets/{id}/moderate              approve / reject
/// /admin/assets/{id}/publish               publish an approved asset
/// /admin/assets/{id}/status                status override (audited)
/// /admin/assets/{id}/audit                 audit trail
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/assets", assets::router())
        .nest("/admin/assets", admin::router())
}
