//! Repository for the `asset_moderations` table (1:1 with assets).

use marketplace_core::types::DbId;
use sqlx::PgPool;

use crate::models::asset::{Asset, AssetModeration, ModerationDecision};
use crate::repositories::AssetRepo;

const COLUMNS: &str = "asset_id, admin_reviewer_id, admin_status_comment, \
    admin_suggested_price_min, admin_suggested_price_max, admin_pricing_comment, \
    decided_status, created_at, updated_at";

/// Records admin moderation decisions. Only the latest decision is kept.
pub struct ModerationRepo;

impl ModerationRepo {
    /// Apply a decision: update the asset status and upsert the moderation
    /// record in one transaction.
    ///
    /// Returns `None` (and writes nothing) if the asset does not exist.
    pub async fn record(
        pool: &PgPool,
        decision: &ModerationDecision,
    ) -> Result<Option<(Asset, AssetModeration)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(asset) =
            AssetRepo::set_status(&mut *tx, decision.asset_id, decision.decided_status).await?
        else {
            tx.rollback().await?;
            tracing::debug!(asset_id = decision.asset_id, "Moderation rolled back, asset missing");
            return Ok(None);
        };

        let query = format!(
            "INSERT INTO asset_moderations (
                asset_id, admin_reviewer_id, admin_status_comment,
                admin_suggested_price_min, admin_suggested_price_max,
                admin_pricing_comment, decided_status
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (asset_id) DO UPDATE SET
                admin_reviewer_id = EXCLUDED.admin_reviewer_id,
                admin_status_comment = EXCLUDED.admin_status_comment,
                admin_suggested_price_min = EXCLUDED.admin_suggested_price_min,
                admin_suggested_price_max = EXCLUDED.admin_suggested_price_max,
                admin_pricing_comment = EXCLUDED.admin_pricing_comment,
                decided_status = EXCLUDED.decided_status,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        let moderation = sqlx::query_as::<_, AssetModeration>(&query)
            .bind(decision.asset_id)
            .bind(decision.reviewer_id)
            .bind(decision.comment.as_deref())
            .bind(decision.suggested_price_min)
            .bind(decision.suggested_price_max)
            .bind(decision.pricing_comment.as_deref())
            .bind(decision.decided_status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(
            asset_id = decision.asset_id,
            status = %decision.decided_status,
            "Moderation decision committed",
        );
        Ok(Some((asset, moderation)))
    }

    pub async fn find_by_asset(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Option<AssetModeration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM asset_moderations WHERE asset_id = $1");
        sqlx::query_as::<_, AssetModeration>(&query)
            .bind(asset_id)
            .fetch_optional(pool)
            .await
    }
}
