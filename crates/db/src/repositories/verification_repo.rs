//! Repository for the `asset_verifications` table (1:1 with assets).

use marketplace_core::types::DbId;
use marketplace_core::verification::VerificationFlag;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::asset::AssetVerification;

const COLUMNS: &str = "asset_id, flags, computed_at";

/// Stores the latest verification flag list per asset.
pub struct VerificationRepo;

impl VerificationRepo {
    /// Replace the stored flags for an asset. Previous flags are discarded.
    pub async fn replace(
        pool: &PgPool,
        asset_id: DbId,
        flags: &[VerificationFlag],
    ) -> Result<AssetVerification, sqlx::Error> {
        let query = format!(
            "INSERT INTO asset_verifications (asset_id, flags)
             VALUES ($1, $2)
             ON CONFLICT (asset_id) DO UPDATE SET
                flags = EXCLUDED.flags,
                computed_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetVerification>(&query)
            .bind(asset_id)
            .bind(Json(flags))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_asset(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Option<AssetVerification>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM asset_verifications WHERE asset_id = $1");
        sqlx::query_as::<_, AssetVerification>(&query)
            .bind(asset_id)
            .fetch_optional(pool)
            .await
    }
}
