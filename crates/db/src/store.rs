//! The repository seam between the orchestrator and persistence.

use async_trait::async_trait;
use marketplace_core::asset::AssetStatus;
use marketplace_core::types::DbId;
use marketplace_core::verification::VerificationFlag;

use crate::models::asset::{
    Asset, AssetMedia, AssetModeration, AssetPerformance, AssetQuery, AssetVerification,
    AuditEntry, CreateAsset, CreateMedia, ModerationDecision, NewAuditEntry, PerformanceInput,
    UpdateAsset, ValuationUpdate,
};

/// PostgreSQL SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Errors raised by an [`AssetStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Whether this error is a unique violation of `constraint`.
    pub fn is_unique_violation_of(&self, constraint: &str) -> bool {
        matches!(self, Self::UniqueViolation { constraint: c } if c == constraint)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) {
                return Self::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or_default().to_string(),
                };
            }
        }
        Self::Database(err)
    }
}

/// Persistence operations over the asset aggregate and its sub-records.
///
/// Methods returning `Option` yield `None` when the referenced asset does
/// not exist. Implementations do not enforce authorization or workflow
/// rules; callers check those before writing.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Confirm the backing store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Insert a new asset in `DRAFT` with the given slug.
    ///
    /// A taken slug fails with [`StoreError::UniqueViolation`] on
    /// [`crate::models::asset::SLUG_CONSTRAINT`].
    async fn insert_asset(
        &self,
        owner_id: DbId,
        slug: &str,
        input: &CreateAsset,
    ) -> Result<Asset, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Asset>, StoreError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Asset>, StoreError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, StoreError>;

    /// Apply the non-`None` fields of `input`. Performance is not touched.
    async fn update_asset(&self, id: DbId, input: &UpdateAsset)
        -> Result<Option<Asset>, StoreError>;

    async fn set_status(&self, id: DbId, status: AssetStatus)
        -> Result<Option<Asset>, StoreError>;

    /// Overwrite the derived valuation columns, including clearing them.
    async fn set_valuation(
        &self,
        id: DbId,
        valuation: &ValuationUpdate,
    ) -> Result<Option<Asset>, StoreError>;

    async fn upsert_performance(
        &self,
        asset_id: DbId,
        input: &PerformanceInput,
    ) -> Result<AssetPerformance, StoreError>;

    async fn find_performance(&self, asset_id: DbId)
        -> Result<Option<AssetPerformance>, StoreError>;

    /// Replace the stored flag list wholesale.
    async fn replace_verification(
        &self,
        asset_id: DbId,
        flags: &[VerificationFlag],
    ) -> Result<AssetVerification, StoreError>;

    async fn find_verification(
        &self,
        asset_id: DbId,
    ) -> Result<Option<AssetVerification>, StoreError>;

    /// Set the asset status to `decision.decided_status` and upsert the
    /// moderation record, both or neither.
    async fn record_moderation(
        &self,
        decision: &ModerationDecision,
    ) -> Result<Option<(Asset, AssetModeration)>, StoreError>;

    async fn find_moderation(&self, asset_id: DbId)
        -> Result<Option<AssetModeration>, StoreError>;

    async fn add_media(&self, asset_id: DbId, input: &CreateMedia)
        -> Result<AssetMedia, StoreError>;

    async fn list_media(&self, asset_id: DbId) -> Result<Vec<AssetMedia>, StoreError>;

    /// Delete one media row belonging to `asset_id`. Returns `true` if removed.
    async fn delete_media(&self, asset_id: DbId, media_id: DbId) -> Result<bool, StoreError>;

    async fn count_media(&self, asset_id: DbId) -> Result<i64, StoreError>;

    /// Matching assets, newest first, paginated by `query.limit`/`query.offset`.
    async fn list_assets(&self, query: &AssetQuery) -> Result<Vec<Asset>, StoreError>;

    /// Total matching assets, ignoring pagination.
    async fn count_assets(&self, query: &AssetQuery) -> Result<i64, StoreError>;

    /// Delete the asset and every sub-record. Returns `true` if removed.
    async fn delete_asset(&self, id: DbId) -> Result<bool, StoreError>;

    async fn record_audit(&self, entry: &NewAuditEntry) -> Result<AuditEntry, StoreError>;

    /// Audit history for an asset, oldest first.
    async fn list_audit(&self, asset_id: DbId) -> Result<Vec<AuditEntry>, StoreError>;
}
