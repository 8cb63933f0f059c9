//! Asset listing models and DTOs.

use marketplace_core::asset::{AssetStatus, AssetType};
use marketplace_core::types::{DbId, Timestamp};
use marketplace_core::valuation::ValuationInput;
use marketplace_core::verification::{VerificationFlag, VerificationSnapshot};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Default page size for asset listing.
pub const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for asset listing.
pub const MAX_LIMIT: i64 = 100;

/// Default currency when a listing does not specify one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Default media kind when none is supplied.
pub const DEFAULT_MEDIA_KIND: &str = "screenshot";

/// Name of the unique constraint guarding `assets.slug`.
pub const SLUG_CONSTRAINT: &str = "uq_assets_slug";

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `assets` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub slug: String,
    #[sqlx(try_from = "String")]
    pub asset_type: AssetType,
    #[sqlx(try_from = "String")]
    pub status: AssetStatus,
    pub owner_id: DbId,
    pub title: String,
    pub short_description: String,
    pub full_description: Option<String>,
    pub asking_price: f64,
    pub currency: String,
    pub suggested_min_price: Option<f64>,
    pub suggested_max_price: Option<f64>,
    pub valuation_note: Option<String>,
    pub monthly_revenue: Option<f64>,
    pub monthly_profit: Option<f64>,
    pub mrr: Option<f64>,
    pub arr: Option<f64>,
    pub churn_rate: Option<f64>,
    pub cac: Option<f64>,
    pub ltv: Option<f64>,
    pub annual_growth_rate: Option<f64>,
    pub website_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Asset {
    /// Valuation model inputs derived from the persisted financial fields.
    ///
    /// Trailing revenue prefers ARR, then monthly revenue, then MRR, each
    /// annualized; trailing profit is monthly profit annualized.
    pub fn valuation_input(&self) -> ValuationInput {
        let trailing_revenue = self
            .arr
            .or_else(|| self.monthly_revenue.map(|m| m * 12.0))
            .or_else(|| self.mrr.map(|m| m * 12.0));

        ValuationInput {
            monthly_recurring_revenue: self.mrr,
            trailing_twelve_month_revenue: trailing_revenue,
            trailing_twelve_month_profit: self.monthly_profit.map(|p| p * 12.0),
            annual_growth_rate_percent: self.annual_growth_rate,
            monthly_churn_rate_percent: self.churn_rate,
            lifetime_value: self.ltv,
            customer_acquisition_cost: self.cac,
        }
    }

    /// Verification rule inputs for this asset with `media_count` attachments.
    pub fn verification_snapshot(&self, media_count: i64) -> VerificationSnapshot {
        VerificationSnapshot {
            asset_type: self.asset_type,
            asking_price: self.asking_price,
            suggested_min_price: self.suggested_min_price,
            suggested_max_price: self.suggested_max_price,
            monthly_revenue: self.monthly_revenue,
            monthly_profit: self.monthly_profit,
            mrr: self.mrr,
            media_count,
            website_url: self.website_url.clone(),
        }
    }
}

/// A row from the `asset_performance` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AssetPerformance {
    pub asset_id: DbId,
    pub monthly_visitors: Option<i64>,
    pub email_subscribers: Option<i64>,
    pub social_followers: Option<i64>,
    pub updated_at: Timestamp,
}

/// A row from the `asset_verifications` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AssetVerification {
    pub asset_id: DbId,
    #[sqlx(json)]
    pub flags: Vec<VerificationFlag>,
    pub computed_at: Timestamp,
}

/// A row from the `asset_moderations` table. Only the latest decision is kept.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AssetModeration {
    pub asset_id: DbId,
    pub admin_reviewer_id: DbId,
    pub admin_status_comment: Option<String>,
    pub admin_suggested_price_min: Option<f64>,
    pub admin_suggested_price_max: Option<f64>,
    pub admin_pricing_comment: Option<String>,
    #[sqlx(try_from = "String")]
    pub decided_status: AssetStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `asset_media` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AssetMedia {
    pub id: DbId,
    pub asset_id: DbId,
    pub url: String,
    pub kind: String,
    pub created_at: Timestamp,
}

/// A row from the `asset_audit_log` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AuditEntry {
    pub id: DbId,
    pub asset_id: DbId,
    pub actor_id: DbId,
    pub action: String,
    pub from_status: String,
    pub to_status: String,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create / update DTOs
// ---------------------------------------------------------------------------

/// Traffic figures, replaced wholesale on every write.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate)]
pub struct PerformanceInput {
    #[validate(range(min = 0))]
    pub monthly_visitors: Option<i64>,
    #[validate(range(min = 0))]
    pub email_subscribers: Option<i64>,
    #[validate(range(min = 0))]
    pub social_followers: Option<i64>,
}

/// DTO for creating a new asset listing.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAsset {
    /// Listing owner. Defaults to the caller; only admins may name someone else.
    #[serde(default)]
    pub owner_id: Option<DbId>,
    pub asset_type: AssetType,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub short_description: String,
    pub full_description: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub asking_price: f64,
    #[validate(length(equal = 3))]
    pub currency: Option<String>,
    pub monthly_revenue: Option<f64>,
    pub monthly_profit: Option<f64>,
    #[validate(range(min = 0.0))]
    pub mrr: Option<f64>,
    #[validate(range(min = 0.0))]
    pub arr: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub churn_rate: Option<f64>,
    #[validate(range(min = 0.0))]
    pub cac: Option<f64>,
    #[validate(range(min = 0.0))]
    pub ltv: Option<f64>,
    pub annual_growth_rate: Option<f64>,
    #[validate(url)]
    pub website_url: Option<String>,
    #[validate(nested)]
    pub performance: Option<PerformanceInput>,
}

/// DTO for patching an asset. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAsset {
    pub asset_type: Option<AssetType>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 500))]
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub asking_price: Option<f64>,
    #[validate(length(equal = 3))]
    pub currency: Option<String>,
    pub monthly_revenue: Option<f64>,
    pub monthly_profit: Option<f64>,
    #[validate(range(min = 0.0))]
    pub mrr: Option<f64>,
    #[validate(range(min = 0.0))]
    pub arr: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub churn_rate: Option<f64>,
    #[validate(range(min = 0.0))]
    pub cac: Option<f64>,
    #[validate(range(min = 0.0))]
    pub ltv: Option<f64>,
    pub annual_growth_rate: Option<f64>,
    #[validate(url)]
    pub website_url: Option<String>,
    #[validate(nested)]
    pub performance: Option<PerformanceInput>,
}

impl UpdateAsset {
    /// Whether applying this patch would change any valuation input of `current`.
    pub fn changes_financials(&self, current: &Asset) -> bool {
        fn differs(patch: Option<f64>, current: Option<f64>) -> bool {
            patch.is_some() && patch != current
        }

        differs(self.monthly_revenue, current.monthly_revenue)
            || differs(self.monthly_profit, current.monthly_profit)
            || differs(self.mrr, current.mrr)
            || differs(self.arr, current.arr)
            || differs(self.churn_rate, current.churn_rate)
            || differs(self.cac, current.cac)
            || differs(self.ltv, current.ltv)
            || differs(self.annual_growth_rate, current.annual_growth_rate)
    }
}

/// Derived valuation columns. Written as-is: `None` clears the column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValuationUpdate {
    pub suggested_min_price: Option<f64>,
    pub suggested_max_price: Option<f64>,
    pub valuation_note: Option<String>,
}

/// A moderation decision to record alongside the status change it causes.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationDecision {
    pub asset_id: DbId,
    pub reviewer_id: DbId,
    pub comment: Option<String>,
    pub suggested_price_min: Option<f64>,
    pub suggested_price_max: Option<f64>,
    pub pricing_comment: Option<String>,
    pub decided_status: AssetStatus,
}

/// DTO for attaching proof media to an asset.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMedia {
    #[validate(url)]
    pub url: String,
    #[validate(length(min = 1, max = 50))]
    pub kind: Option<String>,
}

/// A new audit log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    pub asset_id: DbId,
    pub actor_id: DbId,
    pub action: String,
    pub from_status: AssetStatus,
    pub to_status: AssetStatus,
    pub comment: Option<String>,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Caller-supplied listing filters (`?type=&status=&owner_id=...`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetFilter {
    #[serde(rename = "type")]
    pub asset_type: Option<AssetType>,
    pub status: Option<AssetStatus>,
    pub owner_id: Option<DbId>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A fully resolved listing query, with visibility already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetQuery {
    pub asset_type: Option<AssetType>,
    pub status: Option<AssetStatus>,
    pub owner_id: Option<DbId>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl AssetQuery {
    /// Resolve filters as given, clamping pagination.
    pub fn from_filter(filter: &AssetFilter) -> Self {
        Self {
            asset_type: filter.asset_type,
            status: filter.status,
            owner_id: filter.owner_id,
            min_price: filter.min_price,
            max_price: filter.max_price,
            search: filter
                .search
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            limit: clamp_limit(filter.limit),
            offset: clamp_offset(filter.offset),
        }
    }

    /// Whether `asset` satisfies every filter (ignores pagination).
    pub fn matches(&self, asset: &Asset) -> bool {
        if self.asset_type.is_some_and(|t| t != asset.asset_type) {
            return false;
        }
        if self.status.is_some_and(|s| s != asset.status) {
            return false;
        }
        if self.owner_id.is_some_and(|o| o != asset.owner_id) {
            return false;
        }
        if self.min_price.is_some_and(|p| asset.asking_price < p) {
            return false;
        }
        if self.max_price.is_some_and(|p| asset.asking_price > p) {
            return false;
        }
        if let Some(ref needle) = self.search {
            let needle = needle.to_lowercase();
            let haystacks = [
                Some(asset.title.as_str()),
                Some(asset.short_description.as_str()),
                asset.full_description.as_deref(),
            ];
            if !haystacks
                .into_iter()
                .flatten()
                .any(|h| h.to_lowercase().contains(&needle))
            {
                return false;
            }
        }
        true
    }
}

/// Clamp a requested page size into `1..=MAX_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Clamp a requested offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
