//! Slug assignment under races.
//!
//! [`BlindSlugStore`] always reports candidate slugs as free, so every
//! collision surfaces as a unique violation on insert, just as two concurrent
//! creators would see it.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use common::{listing, SELLER_ID};
use marketplace_api::error::AppError;
use marketplace_api::orchestrator::AssetOrchestrator;
use marketplace_core::actor::ActorContext;
use marketplace_core::asset::AssetStatus;
use marketplace_core::error::CoreError;
use marketplace_core::types::DbId;
use marketplace_core::verification::VerificationFlag;
use marketplace_db::models::asset::{
    Asset, AssetMedia, AssetModeration, AssetPerformance, AssetQuery, AssetVerification,
    AuditEntry, CreateAsset, CreateMedia, ModerationDecision, NewAuditEntry, PerformanceInput,
    UpdateAsset, ValuationUpdate,
};
use marketplace_db::repositories::InMemoryAssetStore;
use marketplace_db::store::{AssetStore, StoreError};

#[derive(Default)]
struct BlindSlugStore {
    inner: InMemoryAssetStore,
}

#[async_trait]
impl AssetStore for BlindSlugStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }

    async fn insert_asset(
        &self,
        owner_id: DbId,
        slug: &str,
        input: &CreateAsset,
    ) -> Result<Asset, StoreError> {
        self.inner.insert_asset(owner_id, slug, input).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Asset>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Asset>, StoreError> {
        self.inner.find_by_slug(slug).await
    }

    async fn slug_exists(&self, _slug: &str) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn update_asset(
        &self,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, StoreError> {
        self.inner.update_asset(id, input).await
    }

    async fn set_status(
        &self,
        id: DbId,
        status: AssetStatus,
    ) -> Result<Option<Asset>, StoreError> {
        self.inner.set_status(id, status).await
    }

    async fn set_valuation(
        &self,
        id: DbId,
        valuation: &ValuationUpdate,
    ) -> Result<Option<Asset>, StoreError> {
        self.inner.set_valuation(id, valuation).await
    }

    async fn upsert_performance(
        &self,
        asset_id: DbId,
        input: &PerformanceInput,
    ) -> Result<AssetPerformance, StoreError> {
        self.inner.upsert_performance(asset_id, input).await
    }

    async fn find_performance(
        &self,
        asset_id: DbId,
    ) -> Result<Option<AssetPerformance>, StoreError> {
        self.inner.find_performance(asset_id).await
    }

    async fn replace_verification(
        &self,
        asset_id: DbId,
        flags: &[VerificationFlag],
    ) -> Result<AssetVerification, StoreError> {
        self.inner.replace_verification(asset_id, flags).await
    }

    async fn find_verification(
        &self,
        asset_id: DbId,
    ) -> Result<Option<AssetVerification>, StoreError> {
        self.inner.find_verification(asset_id).await
    }

    async fn record_moderation(
        &self,
        decision: &ModerationDecision,
    ) -> Result<Option<(Asset, AssetModeration)>, StoreError> {
        self.inner.record_moderation(decision).await
    }

    async fn find_moderation(
        &self,
        asset_id: DbId,
    ) -> Result<Option<AssetModeration>, StoreError> {
        self.inner.find_moderation(asset_id).await
    }

    async fn add_media(
        &self,
        asset_id: DbId,
        input: &CreateMedia,
    ) -> Result<AssetMedia, StoreError> {
        self.inner.add_media(asset_id, input).await
    }

    async fn list_media(&self, asset_id: DbId) -> Result<Vec<AssetMedia>, StoreError> {
        self.inner.list_media(asset_id).await
    }

    async fn delete_media(&self, asset_id: DbId, media_id: DbId) -> Result<bool, StoreError> {
        self.inner.delete_media(asset_id, media_id).await
    }

    async fn count_media(&self, asset_id: DbId) -> Result<i64, StoreError> {
        self.inner.count_media(asset_id).await
    }

    async fn list_assets(&self, query: &AssetQuery) -> Result<Vec<Asset>, StoreError> {
        self.inner.list_assets(query).await
    }

    async fn count_assets(&self, query: &AssetQuery) -> Result<i64, StoreError> {
        self.inner.count_assets(query).await
    }

    async fn delete_asset(&self, id: DbId) -> Result<bool, StoreError> {
        self.inner.delete_asset(id).await
    }

    async fn record_audit(&self, entry: &NewAuditEntry) -> Result<AuditEntry, StoreError> {
        self.inner.record_audit(entry).await
    }

    async fn list_audit(&self, asset_id: DbId) -> Result<Vec<AuditEntry>, StoreError> {
        self.inner.list_audit(asset_id).await
    }
}

fn blind_orchestrator() -> AssetOrchestrator {
    AssetOrchestrator::new(Arc::new(BlindSlugStore::default()))
}

#[tokio::test]
async fn unique_violation_moves_to_next_candidate() {
    let orch = blind_orchestrator();
    let seller = ActorContext::user(SELLER_ID);

    let mut slugs = Vec::new();
    for _ in 0..3 {
        let asset = orch.create_asset(listing("My SaaS"), &seller).await.unwrap();
        slugs.push(asset.slug);
    }

    assert_eq!(slugs, vec!["my-saas", "my-saas-1", "my-saas-2"]);
}

#[tokio::test]
async fn exhausted_candidates_are_a_conflict() {
    let orch = blind_orchestrator().with_slug_max_attempts(2);
    let seller = ActorContext::user(SELLER_ID);

    orch.create_asset(listing("Crowded"), &seller).await.unwrap();
    orch.create_asset(listing("Crowded"), &seller).await.unwrap();

    assert_matches!(
        orch.create_asset(listing("Crowded"), &seller).await,
        Err(AppError::Core(CoreError::Conflict(_)))
    );
}
