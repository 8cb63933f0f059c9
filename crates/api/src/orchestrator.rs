//! Asset lifecycle orchestrator.
//!
//! Coordinates persistence with the pure valuation, verification, and
//! moderation logic in `marketplace_core`. Held in
//! [`AppState`](crate::state::AppState) as an `Arc<AssetOrchestrator>`.
//!
//! Writes are not atomic as a unit: the asset row, performance, valuation
//! columns, and verification flags are written in sequence. Everything
//! derived is a pure function of the persisted snapshot, so
//! [`AssetOrchestrator::revalidate_asset`] can always rebuild it.

use std::sync::Arc;

use marketplace_core::actor::ActorContext;
use marketplace_core::asset::AssetStatus;
use marketplace_core::audit::action_types;
use marketplace_core::error::CoreError;
use marketplace_core::moderation;
use marketplace_core::slug::{slug_candidate, slugify};
use marketplace_core::types::DbId;
use marketplace_core::valuation::compute_valuation;
use marketplace_core::verification::{run_checks, VerificationFlag};
use marketplace_db::models::asset::{
    Asset, AssetFilter, AssetMedia, AssetModeration, AssetPerformance, AssetQuery, AuditEntry,
    CreateAsset, CreateMedia, ModerationDecision, NewAuditEntry, UpdateAsset, ValuationUpdate,
    SLUG_CONSTRAINT,
};
use marketplace_db::store::AssetStore;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::DEFAULT_SLUG_MAX_ATTEMPTS;
use crate::error::{AppError, AppResult};

/// Note stored in `valuation_note` when there is no revenue basis.
pub const VALUATION_UNAVAILABLE_NOTE: &str =
    "Valuation unavailable: no usable MRR or trailing revenue provided";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of an admin moderation request.
#[derive(Debug, Clone, Deserialize)]
pub struct ModerateRequest {
    /// `APPROVE` or `REJECT` (case-insensitive).
    pub action: String,
    pub comment: Option<String>,
    pub suggested_price_min: Option<f64>,
    pub suggested_price_max: Option<f64>,
    pub pricing_comment: Option<String>,
}

/// Body of an admin status override.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusOverrideRequest {
    pub status: AssetStatus,
    pub comment: Option<String>,
}

/// One page of a listing.
#[derive(Debug, Serialize)]
pub struct AssetPage {
    pub items: Vec<Asset>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// An asset with its sub-records.
#[derive(Debug, Serialize)]
pub struct AssetDetail {
    pub asset: Asset,
    pub performance: Option<AssetPerformance>,
    pub verification_flags: Vec<VerificationFlag>,
    pub media: Vec<AssetMedia>,
    /// Present only for the owner and admins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderation: Option<AssetModeration>,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Runs every asset lifecycle operation against an injected [`AssetStore`].
pub struct AssetOrchestrator {
    store: Arc<dyn AssetStore>,
    slug_max_attempts: u32,
}

impl AssetOrchestrator {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self {
            store,
            slug_max_attempts: DEFAULT_SLUG_MAX_ATTEMPTS,
        }
    }

    /// Bound the number of insert attempts lost to concurrent slug claims per
    /// creation (minimum 1).
    pub fn with_slug_max_attempts(mut self, attempts: u32) -> Self {
        self.slug_max_attempts = attempts.max(1);
        self
    }

    pub fn store(&self) -> &Arc<dyn AssetStore> {
        &self.store
    }

    // -- create / update ---------------------------------------------------

    /// Create a draft asset, then derive its valuation and verification flags.
    pub async fn create_asset(
        &self,
        input: CreateAsset,
        actor: &ActorContext,
    ) -> AppResult<Asset> {
        input.validate()?;

        let owner_id = match input.owner_id {
            Some(owner_id) if owner_id != actor.user_id && !actor.is_admin => {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Only admins can create assets on behalf of another user".into(),
                )));
            }
            Some(owner_id) => owner_id,
            None => actor.user_id,
        };

        let asset = self.insert_with_unique_slug(owner_id, &input).await?;
        tracing::info!(
            asset_id = asset.id,
            slug = %asset.slug,
            owner_id,
            actor_id = actor.user_id,
            "Asset created",
        );

        if let Some(ref performance) = input.performance {
            self.store.upsert_performance(asset.id, performance).await?;
        }

        let asset = self.apply_valuation(asset).await?;
        self.refresh_verification(&asset).await?;
        Ok(asset)
    }

    /// Apply a partial update.
    ///
    /// Valuation is recomputed only when a financial field actually changes;
    /// verification is always recomputed.
    pub async fn update_asset(
        &self,
        id: DbId,
        patch: UpdateAsset,
        actor: &ActorContext,
    ) -> AppResult<Asset> {
        patch.validate()?;

        let current = self.load(id).await?;
        ensure_can_mutate(&current, actor)?;

        let financials_changed = patch.changes_financials(&current);
        let mut asset = self
            .store
            .update_asset(id, &patch)
            .await?
            .ok_or_else(|| asset_not_found(id))?;

        if let Some(ref performance) = patch.performance {
            self.store.upsert_performance(id, performance).await?;
        }

        if financials_changed {
            asset = self.apply_valuation(asset).await?;
        }
        self.refresh_verification(&asset).await?;

        tracing::info!(
            asset_id = id,
            actor_id = actor.user_id,
            financials_changed,
            "Asset updated",
        );
        Ok(asset)
    }

    // -- reads -------------------------------------------------------------

    /// Look up an asset by numeric id or slug.
    ///
    /// Returns `None` both for unknown assets and for assets the caller is
    /// not allowed to see.
    pub async fn get_asset_by_id_or_slug(
        &self,
        id_or_slug: &str,
        actor: Option<&ActorContext>,
    ) -> AppResult<Option<Asset>> {
        let asset = match id_or_slug.parse::<DbId>() {
            Ok(id) => match self.store.find_by_id(id).await? {
                Some(asset) => Some(asset),
                // Purely numeric titles produce numeric slugs.
                None => self.store.find_by_slug(id_or_slug).await?,
            },
            Err(_) => self.store.find_by_slug(id_or_slug).await?,
        };
        Ok(asset.filter(|a| can_view(a, actor)))
    }

    /// The visible asset with performance, flags, media, and (for the owner
    /// or an admin) the latest moderation record.
    pub async fn get_asset_detail(
        &self,
        id_or_slug: &str,
        actor: Option<&ActorContext>,
    ) -> AppResult<Option<AssetDetail>> {
        match self.get_asset_by_id_or_slug(id_or_slug, actor).await? {
            Some(asset) => Ok(Some(self.build_detail(asset, actor).await?)),
            None => Ok(None),
        }
    }

    /// List assets with visibility applied.
    ///
    /// Admins see everything. An owner filtering on their own `owner_id`
    /// sees all of their assets. Everyone else only sees `PUBLISHED`.
    pub async fn list_assets(
        &self,
        filter: &AssetFilter,
        actor: Option<&ActorContext>,
    ) -> AppResult<AssetPage> {
        let mut query = AssetQuery::from_filter(filter);

        let privileged = match actor {
            Some(a) if a.is_admin => true,
            Some(a) => filter.owner_id == Some(a.user_id),
            None => false,
        };
        if !privileged {
            let requested = query.status;
            match requested {
                Some(status) if !status.is_public() => {
                    return Ok(AssetPage {
                        items: Vec::new(),
                        total: 0,
                        limit: query.limit,
                        offset: query.offset,
                    });
                }
                _ => query.status = Some(AssetStatus::Published),
            }
        }

        let items = self.store.list_assets(&query).await?;
        let total = self.store.count_assets(&query).await?;

        Ok(AssetPage {
            items,
            total,
            limit: query.limit,
            offset: query.offset,
        })
    }

    // -- workflow ----------------------------------------------------------

    /// Owner submits a draft. The asset lands in `PENDING_REVIEW`.
    pub async fn submit_asset(&self, id: DbId, actor: &ActorContext) -> AppResult<Asset> {
        let current = self.load(id).await?;
        let submitted = moderation::submit(current.status, current.owner_id, actor)?;
        let pending = moderation::begin_review(submitted)?;

        self.store.set_status(id, submitted).await?;
        let asset = self
            .store
            .set_status(id, pending)
            .await?
            .ok_or_else(|| asset_not_found(id))?;

        tracing::info!(
            asset_id = id,
            actor_id = actor.user_id,
            status = %asset.status,
            "Asset submitted for review",
        );
        Ok(asset)
    }

    /// Admin approves or rejects an asset in `PENDING_REVIEW`.
    ///
    /// Every check runs before anything is written, so a rejected request
    /// leaves status and moderation record untouched.
    pub async fn moderate_asset(
        &self,
        id: DbId,
        request: ModerateRequest,
        actor: &ActorContext,
    ) -> AppResult<Asset> {
        require_admin(actor)?;
        let current = self.load(id).await?;
        let (action, next) = moderation::moderate(current.status, &request.action, actor)?;
        validate_suggested_bounds(request.suggested_price_min, request.suggested_price_max)?;

        let decision = ModerationDecision {
            asset_id: id,
            reviewer_id: actor.user_id,
            comment: request.comment.clone(),
            suggested_price_min: request.suggested_price_min,
            suggested_price_max: request.suggested_price_max,
            pricing_comment: request.pricing_comment,
            decided_status: next,
        };
        let (asset, _) = self
            .store
            .record_moderation(&decision)
            .await?
            .ok_or_else(|| asset_not_found(id))?;

        self.store
            .record_audit(&NewAuditEntry {
                asset_id: id,
                actor_id: actor.user_id,
                action: action_types::MODERATE.to_string(),
                from_status: current.status,
                to_status: next,
                comment: request.comment,
            })
            .await?;

        tracing::info!(
            asset_id = id,
            reviewer_id = actor.user_id,
            action = action.as_str(),
            status = %next,
            "Moderation decision recorded",
        );
        Ok(asset)
    }

    /// Admin publishes an approved asset.
    pub async fn publish_asset(&self, id: DbId, actor: &ActorContext) -> AppResult<Asset> {
        require_admin(actor)?;
        let current = self.load(id).await?;
        let next = moderation::publish(current.status, actor)?;

        let asset = self
            .store
            .set_status(id, next)
            .await?
            .ok_or_else(|| asset_not_found(id))?;

        self.store
            .record_audit(&NewAuditEntry {
                asset_id: id,
                actor_id: actor.user_id,
                action: action_types::PUBLISH.to_string(),
                from_status: current.status,
                to_status: next,
                comment: None,
            })
            .await?;

        tracing::info!(asset_id = id, admin_id = actor.user_id, "Asset published");
        Ok(asset)
    }

    /// Admin sets any status directly, bypassing the transition table.
    ///
    /// Always audited, and logged at warn level so it stands apart from the
    /// guarded moderation path.
    pub async fn override_status(
        &self,
        id: DbId,
        request: StatusOverrideRequest,
        actor: &ActorContext,
    ) -> AppResult<Asset> {
        require_admin(actor)?;
        let current = self.load(id).await?;
        let change = moderation::override_status(current.status, request.status, actor)?;

        let asset = self
            .store
            .set_status(id, change.to)
            .await?
            .ok_or_else(|| asset_not_found(id))?;

        self.store
            .record_audit(&NewAuditEntry {
                asset_id: id,
                actor_id: actor.user_id,
                action: action_types::STATUS_OVERRIDE.to_string(),
                from_status: change.from,
                to_status: change.to,
                comment: request.comment,
            })
            .await?;

        tracing::warn!(
            asset_id = id,
            admin_id = actor.user_id,
            from = %change.from,
            to = %change.to,
            bypassed_guard = change.bypassed_guard,
            "Admin status override applied",
        );
        Ok(asset)
    }

    // -- derived data ------------------------------------------------------

    /// Recompute valuation and verification from the persisted snapshot.
    pub async fn revalidate_asset(&self, id: DbId, actor: &ActorContext) -> AppResult<AssetDetail> {
        let current = self.load(id).await?;
        if !actor.is_owner_or_admin(current.owner_id) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only the owner or an admin can revalidate this asset".into(),
            )));
        }

        let asset = self.apply_valuation(current).await?;
        self.refresh_verification(&asset).await?;

        tracing::info!(asset_id = id, actor_id = actor.user_id, "Asset revalidated");
        self.build_detail(asset, Some(actor)).await
    }

    // -- media -------------------------------------------------------------

    pub async fn add_media(
        &self,
        id: DbId,
        input: CreateMedia,
        actor: &ActorContext,
    ) -> AppResult<AssetMedia> {
        input.validate()?;
        let asset = self.load(id).await?;
        ensure_can_mutate(&asset, actor)?;

        let media = self.store.add_media(id, &input).await?;
        self.refresh_verification(&asset).await?;

        tracing::info!(asset_id = id, media_id = media.id, "Media attached");
        Ok(media)
    }

    pub async fn remove_media(
        &self,
        id: DbId,
        media_id: DbId,
        actor: &ActorContext,
    ) -> AppResult<()> {
        let asset = self.load(id).await?;
        ensure_can_mutate(&asset, actor)?;

        if !self.store.delete_media(id, media_id).await? {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "AssetMedia",
                id: media_id,
            }));
        }
        self.refresh_verification(&asset).await?;

        tracing::info!(asset_id = id, media_id, "Media removed");
        Ok(())
    }

    // -- delete ------------------------------------------------------------

    /// Delete an asset and all of its sub-records.
    pub async fn delete_asset(&self, id: DbId, actor: &ActorContext) -> AppResult<()> {
        let asset = self.load(id).await?;
        if !actor.is_owner_or_admin(asset.owner_id) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only the owner or an admin can delete this asset".into(),
            )));
        }

        if !self.store.delete_asset(id).await? {
            return Err(asset_not_found(id));
        }

        tracing::info!(asset_id = id, actor_id = actor.user_id, "Asset deleted");
        Ok(())
    }

    // -- audit -------------------------------------------------------------

    /// Status-change audit trail for one asset, oldest first. Admin only.
    pub async fn list_audit(
        &self,
        id: DbId,
        actor: &ActorContext,
    ) -> AppResult<Vec<AuditEntry>> {
        require_admin(actor)?;
        self.load(id).await?;
        Ok(self.store.list_audit(id).await?)
    }

    // -- internals ---------------------------------------------------------

    async fn load(&self, id: DbId) -> AppResult<Asset> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| asset_not_found(id))
    }

    /// Insert under the first free slug candidate.
    ///
    /// The existence pre-check is only a hint; the store's unique constraint
    /// decides, and a violation moves on to the next candidate. Candidates
    /// skipped by the pre-check are free. Only lost insert races count
    /// against `slug_max_attempts`.
    async fn insert_with_unique_slug(
        &self,
        owner_id: DbId,
        input: &CreateAsset,
    ) -> AppResult<Asset> {
        let base = slugify(&input.title);
        let mut suffix: u32 = 0;
        let mut collisions: u32 = 0;

        loop {
            let candidate = slug_candidate(&base, suffix);
            suffix = suffix.checked_add(1).ok_or_else(|| {
                AppError::Core(CoreError::Conflict(format!(
                    "No free slug for '{base}'"
                )))
            })?;

            if self.store.slug_exists(&candidate).await? {
                continue;
            }
            match self.store.insert_asset(owner_id, &candidate, input).await {
                Ok(asset) => return Ok(asset),
                Err(err) if err.is_unique_violation_of(SLUG_CONSTRAINT) => {
                    collisions += 1;
                    tracing::debug!(slug = %candidate, collisions, "Slug claimed concurrently, retrying");
                    if collisions >= self.slug_max_attempts {
                        break;
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }

        tracing::warn!(
            base_slug = %base,
            collisions,
            "Slug insert retries exhausted",
        );
        Err(AppError::Core(CoreError::Conflict(format!(
            "No free slug for '{base}' after {collisions} concurrent collisions"
        ))))
    }

    /// Recompute and persist the suggested range. An unavailable valuation
    /// clears the range rather than writing zero.
    async fn apply_valuation(&self, asset: Asset) -> AppResult<Asset> {
        let update = match compute_valuation(&asset.valuation_input()) {
            Some(valuation) => {
                tracing::debug!(
                    asset_id = asset.id,
                    multiple = valuation.multiple,
                    suggested_min = valuation.suggested_min,
                    suggested_max = valuation.suggested_max,
                    "Valuation computed",
                );
                ValuationUpdate {
                    suggested_min_price: Some(valuation.suggested_min),
                    suggested_max_price: Some(valuation.suggested_max),
                    valuation_note: Some(valuation.explanation),
                }
            }
            None => {
                tracing::debug!(asset_id = asset.id, "Valuation unavailable");
                ValuationUpdate {
                    suggested_min_price: None,
                    suggested_max_price: None,
                    valuation_note: Some(VALUATION_UNAVAILABLE_NOTE.to_string()),
                }
            }
        };

        self.store
            .set_valuation(asset.id, &update)
            .await?
            .ok_or_else(|| asset_not_found(asset.id))
    }

    /// Recompute and replace the verification flags for `asset`.
    async fn refresh_verification(&self, asset: &Asset) -> AppResult<Vec<VerificationFlag>> {
        let media_count = self.store.count_media(asset.id).await?;
        let flags = run_checks(&asset.verification_snapshot(media_count));
        let stored = self.store.replace_verification(asset.id, &flags).await?;

        tracing::debug!(
            asset_id = asset.id,
            flag_count = stored.flags.len(),
            "Verification flags recomputed",
        );
        Ok(stored.flags)
    }

    async fn build_detail(
        &self,
        asset: Asset,
        actor: Option<&ActorContext>,
    ) -> AppResult<AssetDetail> {
        let performance = self.store.find_performance(asset.id).await?;
        let verification_flags = self
            .store
            .find_verification(asset.id)
            .await?
            .map(|v| v.flags)
            .unwrap_or_default();
        let media = self.store.list_media(asset.id).await?;

        let moderation = if actor.is_some_and(|a| a.is_owner_or_admin(asset.owner_id)) {
            self.store.find_moderation(asset.id).await?
        } else {
            None
        };

        Ok(AssetDetail {
            asset,
            performance,
            verification_flags,
            media,
            moderation,
        })
    }
}

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

fn asset_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Asset", id })
}

fn can_view(asset: &Asset, actor: Option<&ActorContext>) -> bool {
    asset.status.is_public() || actor.is_some_and(|a| a.is_owner_or_admin(asset.owner_id))
}

fn require_admin(actor: &ActorContext) -> AppResult<()> {
    if actor.is_admin {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Admin role required".into(),
        )))
    }
}

/// Owners may change their listing only while it is a draft; admins always.
fn ensure_can_mutate(asset: &Asset, actor: &ActorContext) -> AppResult<()> {
    if !actor.is_owner_or_admin(asset.owner_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner or an admin can modify this asset".into(),
        )));
    }
    if !actor.is_admin && !moderation::owner_can_edit(asset.status) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Asset can only be edited while {}, but is {}",
            AssetStatus::Draft,
            asset.status
        ))));
    }
    Ok(())
}

fn validate_suggested_bounds(min: Option<f64>, max: Option<f64>) -> AppResult<()> {
    for bound in [min, max].into_iter().flatten() {
        if !bound.is_finite() || bound <= 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "Suggested prices must be positive".into(),
            )));
        }
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(AppError::Core(CoreError::Validation(
                "suggested_price_min must not exceed suggested_price_max".into(),
            )));
        }
    }
    Ok(())
}
