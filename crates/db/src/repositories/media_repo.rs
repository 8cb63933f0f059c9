//! Repository for the `asset_media` table.

use marketplace_core::types::DbId;
use sqlx::PgPool;

use crate::models::asset::{AssetMedia, CreateMedia, DEFAULT_MEDIA_KIND};

const COLUMNS: &str = "id, asset_id, url, kind, created_at";

/// Proof media (screenshots, documents) attached to an asset.
pub struct MediaRepo;

impl MediaRepo {
    pub async fn create(
        pool: &PgPool,
        asset_id: DbId,
        input: &CreateMedia,
    ) -> Result<AssetMedia, sqlx::Error> {
        let query = format!(
            "INSERT INTO asset_media (asset_id, url, kind)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetMedia>(&query)
            .bind(asset_id)
            .bind(&input.url)
            .bind(input.kind.as_deref().unwrap_or(DEFAULT_MEDIA_KIND))
            .fetch_one(pool)
            .await
    }

    /// List media for an asset in upload order.
    pub async fn list_by_asset(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Vec<AssetMedia>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM asset_media WHERE asset_id = $1 ORDER BY id");
        sqlx::query_as::<_, AssetMedia>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_asset(pool: &PgPool, asset_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM asset_media WHERE asset_id = $1")
            .bind(asset_id)
            .fetch_one(pool)
            .await
    }

    /// Delete a media row scoped to its asset. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, asset_id: DbId, media_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM asset_media WHERE id = $1 AND asset_id = $2")
            .bind(media_id)
            .bind(asset_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
