//! Repository for the `asset_performance` table (1:1 with assets).

use marketplace_core::types::DbId;
use sqlx::PgPool;

use crate::models::asset::{AssetPerformance, PerformanceInput};

const COLUMNS: &str =
    "asset_id, monthly_visitors, email_subscribers, social_followers, updated_at";

/// Upsert and lookup for traffic figures.
pub struct PerformanceRepo;

impl PerformanceRepo {
    /// Replace the performance row for an asset wholesale.
    pub async fn upsert(
        pool: &PgPool,
        asset_id: DbId,
        input: &PerformanceInput,
    ) -> Result<AssetPerformance, sqlx::Error> {
        let query = format!(
            "INSERT INTO asset_performance
                (asset_id, monthly_visitors, email_subscribers, social_followers)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (asset_id) DO UPDATE SET
                monthly_visitors = EXCLUDED.monthly_visitors,
                email_subscribers = EXCLUDED.email_subscribers,
                social_followers = EXCLUDED.social_followers,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetPerformance>(&query)
            .bind(asset_id)
            .bind(input.monthly_visitors)
            .bind(input.email_subscribers)
            .bind(input.social_followers)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_asset(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Option<AssetPerformance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM asset_performance WHERE asset_id = $1");
        sqlx::query_as::<_, AssetPerformance>(&query)
            .bind(asset_id)
            .fetch_optional(pool)
            .await
    }
}
