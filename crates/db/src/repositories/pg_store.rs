//! [`AssetStore`] backed by PostgreSQL.

use async_trait::async_trait;
use marketplace_core::asset::AssetStatus;
use marketplace_core::types::DbId;
use marketplace_core::verification::VerificationFlag;

use crate::models::asset::{
    Asset, AssetMedia, AssetModeration, AssetPerformance, AssetQuery, AssetVerification,
    AuditEntry, CreateAsset, CreateMedia, ModerationDecision, NewAuditEntry, PerformanceInput,
    UpdateAsset, ValuationUpdate,
};
use crate::repositories::{
    AssetRepo, AuditRepo, MediaRepo, ModerationRepo, PerformanceRepo, VerificationRepo,
};
use crate::store::{AssetStore, StoreError};
use crate::DbPool;

/// Delegates every operation to the table repositories.
#[derive(Clone)]
pub struct PgAssetStore {
    pool: DbPool,
}

impl PgAssetStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl AssetStore for PgAssetStore {
    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn insert_asset(
        &self,
        owner_id: DbId,
        slug: &str,
        input: &CreateAsset,
    ) -> Result<Asset, StoreError> {
        Ok(AssetRepo::create(&self.pool, owner_id, slug, input).await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Asset>, StoreError> {
        Ok(AssetRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Asset>, StoreError> {
        Ok(AssetRepo::find_by_slug(&self.pool, slug).await?)
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, StoreError> {
        Ok(AssetRepo::slug_exists(&self.pool, slug).await?)
    }

    async fn update_asset(
        &self,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, StoreError> {
        Ok(AssetRepo::update(&self.pool, id, input).await?)
    }

    async fn set_status(
        &self,
        id: DbId,
        status: AssetStatus,
    ) -> Result<Option<Asset>, StoreError> {
        Ok(AssetRepo::set_status(&self.pool, id, status).await?)
    }

    async fn set_valuation(
        &self,
        id: DbId,
        valuation: &ValuationUpdate,
    ) -> Result<Option<Asset>, StoreError> {
        Ok(AssetRepo::set_valuation(&self.pool, id, valuation).await?)
    }

    async fn upsert_performance(
        &self,
        asset_id: DbId,
        input: &PerformanceInput,
    ) -> Result<AssetPerformance, StoreError> {
        Ok(PerformanceRepo::upsert(&self.pool, asset_id, input).await?)
    }

    async fn find_performance(
        &self,
        asset_id: DbId,
    ) -> Result<Option<AssetPerformance>, StoreError> {
        Ok(PerformanceRepo::find_by_asset(&self.pool, asset_id).await?)
    }

    async fn replace_verification(
        &self,
        asset_id: DbId,
        flags: &[VerificationFlag],
    ) -> Result<AssetVerification, StoreError> {
        Ok(VerificationRepo::replace(&self.pool, asset_id, flags).await?)
    }

    async fn find_verification(
        &self,
        asset_id: DbId,
    ) -> Result<Option<AssetVerification>, StoreError> {
        Ok(VerificationRepo::find_by_asset(&self.pool, asset_id).await?)
    }

    async fn record_moderation(
        &self,
        decision: &ModerationDecision,
    ) -> Result<Option<(Asset, AssetModeration)>, StoreError> {
        Ok(ModerationRepo::record(&self.pool, decision).await?)
    }

    async fn find_moderation(
        &self,
        asset_id: DbId,
    ) -> Result<Option<AssetModeration>, StoreError> {
        Ok(ModerationRepo::find_by_asset(&self.pool, asset_id).await?)
    }

    async fn add_media(
        &self,
        asset_id: DbId,
        input: &CreateMedia,
    ) -> Result<AssetMedia, StoreError> {
        Ok(MediaRepo::create(&self.pool, asset_id, input).await?)
    }

    async fn list_media(&self, asset_id: DbId) -> Result<Vec<AssetMedia>, StoreError> {
        Ok(MediaRepo::list_by_asset(&self.pool, asset_id).await?)
    }

    async fn delete_media(&self, asset_id: DbId, media_id: DbId) -> Result<bool, StoreError> {
        Ok(MediaRepo::delete(&self.pool, asset_id, media_id).await?)
    }

    async fn count_media(&self, asset_id: DbId) -> Result<i64, StoreError> {
        Ok(MediaRepo::count_by_asset(&self.pool, asset_id).await?)
    }

    async fn list_assets(&self, query: &AssetQuery) -> Result<Vec<Asset>, StoreError> {
        Ok(AssetRepo::list(&self.pool, query).await?)
    }

    async fn count_assets(&self, query: &AssetQuery) -> Result<i64, StoreError> {
        Ok(AssetRepo::count(&self.pool, query).await?)
    }

    async fn delete_asset(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(AssetRepo::delete(&self.pool, id).await?)
    }

    async fn record_audit(&self, entry: &NewAuditEntry) -> Result<AuditEntry, StoreError> {
        Ok(AuditRepo::create(&self.pool, entry).await?)
    }

    async fn list_audit(&self, asset_id: DbId) -> Result<Vec<AuditEntry>, StoreError> {
        Ok(AuditRepo::list_by_asset(&self.pool, asset_id).await?)
    }
}
