//! Route definitions for `/assets`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Asset routes mounted at `/assets`.
///
/// ```text
/// GET    /                       -> list_assets
/// POST   /                       -> create_asset
/// GET    /{id}                   -> get_asset (numeric id or slug)
/// PATCH  /{id}                   -> update_asset
/// DELETE /{id}                   -> delete_asset
/// POST   /{id}/submit            -> submit_asset
/// POST   /{id}/revalidate        -> revalidate_asset
/// POST   /{id}/media             -> add_media
/// DELETE /{id}/media/{media_id}  -> remove_media
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list_assets).post(assets::create_asset))
        .route(
            "/{id}",
            get(assets::get_asset)
                .patch(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/{id}/submit", post(assets::submit_asset))
        .route("/{id}/revalidate", post(assets::revalidate_asset))
        .route("/{id}/media", post(assets::add_media))
        .route("/{id}/media/{media_id}", delete(assets::remove_media))
}
