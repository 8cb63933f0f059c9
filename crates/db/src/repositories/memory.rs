//! [`AssetStore`] held entirely in process memory.
//!
//! Mirrors the PostgreSQL schema's guarantees that callers rely on: slug
//! uniqueness surfaces as [`StoreError::UniqueViolation`], deleting an asset
//! removes its sub-records, and a moderation decision is applied atomically.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use marketplace_core::asset::AssetStatus;
use marketplace_core::types::DbId;
use marketplace_core::verification::VerificationFlag;
use tokio::sync::Mutex;

use crate::models::asset::{
    Asset, AssetMedia, AssetModeration, AssetPerformance, AssetQuery, AssetVerification,
    AuditEntry, CreateAsset, CreateMedia, ModerationDecision, NewAuditEntry, PerformanceInput,
    UpdateAsset, ValuationUpdate, DEFAULT_CURRENCY, DEFAULT_MEDIA_KIND, SLUG_CONSTRAINT,
};
use crate::store::{AssetStore, StoreError};

#[derive(Default)]
struct Tables {
    next_asset_id: DbId,
    next_media_id: DbId,
    next_audit_id: DbId,
    assets: BTreeMap<DbId, Asset>,
    performance: HashMap<DbId, AssetPerformance>,
    verifications: HashMap<DbId, AssetVerification>,
    moderations: HashMap<DbId, AssetModeration>,
    media: BTreeMap<DbId, AssetMedia>,
    audit: Vec<AuditEntry>,
}

impl Tables {
    fn next_id(counter: &mut DbId) -> DbId {
        *counter += 1;
        *counter
    }
}

/// A thread-safe in-memory store.
#[derive(Default)]
pub struct InMemoryAssetStore {
    tables: Mutex<Tables>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_asset(
        &self,
        owner_id: DbId,
        slug: &str,
        input: &CreateAsset,
    ) -> Result<Asset, StoreError> {
        let mut t = self.tables.lock().await;
        if t.assets.values().any(|a| a.slug == slug) {
            return Err(StoreError::UniqueViolation {
                constraint: SLUG_CONSTRAINT.to_string(),
            });
        }

        let now = Utc::now();
        let id = Tables::next_id(&mut t.next_asset_id);
        let asset = Asset {
            id,
            slug: slug.to_string(),
            asset_type: input.asset_type,
            status: AssetStatus::Draft,
            owner_id,
            title: input.title.clone(),
            short_description: input.short_description.clone(),
            full_description: input.full_description.clone(),
            asking_price: input.asking_price,
            currency: input
                .currency
                .clone()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            suggested_min_price: None,
            suggested_max_price: None,
            valuation_note: None,
            monthly_revenue: input.monthly_revenue,
            monthly_profit: input.monthly_profit,
            mrr: input.mrr,
            arr: input.arr,
            churn_rate: input.churn_rate,
            cac: input.cac,
            ltv: input.ltv,
            annual_growth_rate: input.annual_growth_rate,
            website_url: input.website_url.clone(),
            created_at: now,
            updated_at: now,
        };
        t.assets.insert(id, asset.clone());
        Ok(asset)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Asset>, StoreError> {
        Ok(self.tables.lock().await.assets.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Asset>, StoreError> {
        let t = self.tables.lock().await;
        Ok(t.assets.values().find(|a| a.slug == slug).cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, StoreError> {
        let t = self.tables.lock().await;
        Ok(t.assets.values().any(|a| a.slug == slug))
    }

    async fn update_asset(
        &self,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, StoreError> {
        let mut t = self.tables.lock().await;
        let Some(asset) = t.assets.get_mut(&id) else {
            return Ok(None);
        };

        fn keep<T: Clone>(patch: &Option<T>, current: &mut T) {
            if let Some(v) = patch {
                *current = v.clone();
            }
        }
        fn keep_opt<T: Clone>(patch: &Option<T>, current: &mut Option<T>) {
            if patch.is_some() {
                *current = patch.clone();
            }
        }

        keep(&input.asset_type, &mut asset.asset_type);
        keep(&input.title, &mut asset.title);
        keep(&input.short_description, &mut asset.short_description);
        keep_opt(&input.full_description, &mut asset.full_description);
        keep(&input.asking_price, &mut asset.asking_price);
        keep(&input.currency, &mut asset.currency);
        keep_opt(&input.monthly_revenue, &mut asset.monthly_revenue);
        keep_opt(&input.monthly_profit, &mut asset.monthly_profit);
        keep_opt(&input.mrr, &mut asset.mrr);
        keep_opt(&input.arr, &mut asset.arr);
        keep_opt(&input.churn_rate, &mut asset.churn_rate);
        keep_opt(&input.cac, &mut asset.cac);
        keep_opt(&input.ltv, &mut asset.ltv);
        keep_opt(&input.annual_growth_rate, &mut asset.annual_growth_rate);
        keep_opt(&input.website_url, &mut asset.website_url);
        asset.updated_at = Utc::now();

        Ok(Some(asset.clone()))
    }

    async fn set_status(
        &self,
        id: DbId,
        status: AssetStatus,
    ) -> Result<Option<Asset>, StoreError> {
        let mut t = self.tables.lock().await;
        Ok(t.assets.get_mut(&id).map(|asset| {
            asset.status = status;
            asset.updated_at = Utc::now();
            asset.clone()
        }))
    }

    async fn set_valuation(
        &self,
        id: DbId,
        valuation: &ValuationUpdate,
    ) -> Result<Option<Asset>, StoreError> {
        let mut t = self.tables.lock().await;
        Ok(t.assets.get_mut(&id).map(|asset| {
            asset.suggested_min_price = valuation.suggested_min_price;
            asset.suggested_max_price = valuation.suggested_max_price;
            asset.valuation_note = valuation.valuation_note.clone();
            asset.updated_at = Utc::now();
            asset.clone()
        }))
    }

    async fn upsert_performance(
        &self,
        asset_id: DbId,
        input: &PerformanceInput,
    ) -> Result<AssetPerformance, StoreError> {
        let mut t = self.tables.lock().await;
        ensure_asset(&t, asset_id)?;
        let row = AssetPerformance {
            asset_id,
            monthly_visitors: input.monthly_visitors,
            email_subscribers: input.email_subscribers,
            social_followers: input.social_followers,
            updated_at: Utc::now(),
        };
        t.performance.insert(asset_id, row.clone());
        Ok(row)
    }

    async fn find_performance(
        &self,
        asset_id: DbId,
    ) -> Result<Option<AssetPerformance>, StoreError> {
        Ok(self.tables.lock().await.performance.get(&asset_id).cloned())
    }

    async fn replace_verification(
        &self,
        asset_id: DbId,
        flags: &[VerificationFlag],
    ) -> Result<AssetVerification, StoreError> {
        let mut t = self.tables.lock().await;
        ensure_asset(&t, asset_id)?;
        let row = AssetVerification {
            asset_id,
            flags: flags.to_vec(),
            computed_at: Utc::now(),
        };
        t.verifications.insert(asset_id, row.clone());
        Ok(row)
    }

    async fn find_verification(
        &self,
        asset_id: DbId,
    ) -> Result<Option<AssetVerification>, StoreError> {
        Ok(self.tables.lock().await.verifications.get(&asset_id).cloned())
    }

    async fn record_moderation(
        &self,
        decision: &ModerationDecision,
    ) -> Result<Option<(Asset, AssetModeration)>, StoreError> {
        let mut t = self.tables.lock().await;
        let now = Utc::now();

        let Some(asset) = t.assets.get_mut(&decision.asset_id) else {
            return Ok(None);
        };
        asset.status = decision.decided_status;
        asset.updated_at = now;
        let asset = asset.clone();

        let created_at = t
            .moderations
            .get(&decision.asset_id)
            .map_or(now, |m| m.created_at);
        let moderation = AssetModeration {
            asset_id: decision.asset_id,
            admin_reviewer_id: decision.reviewer_id,
            admin_status_comment: decision.comment.clone(),
            admin_suggested_price_min: decision.suggested_price_min,
            admin_suggested_price_max: decision.suggested_price_max,
            admin_pricing_comment: decision.pricing_comment.clone(),
            decided_status: decision.decided_status,
            created_at,
            updated_at: now,
        };
        t.moderations.insert(decision.asset_id, moderation.clone());

        Ok(Some((asset, moderation)))
    }

    async fn find_moderation(
        &self,
        asset_id: DbId,
    ) -> Result<Option<AssetModeration>, StoreError> {
        Ok(self.tables.lock().await.moderations.get(&asset_id).cloned())
    }

    async fn add_media(
        &self,
        asset_id: DbId,
        input: &CreateMedia,
    ) -> Result<AssetMedia, StoreError> {
        let mut t = self.tables.lock().await;
        ensure_asset(&t, asset_id)?;
        let id = Tables::next_id(&mut t.next_media_id);
        let row = AssetMedia {
            id,
            asset_id,
            url: input.url.clone(),
            kind: input
                .kind
                .clone()
                .unwrap_or_else(|| DEFAULT_MEDIA_KIND.to_string()),
            created_at: Utc::now(),
        };
        t.media.insert(id, row.clone());
        Ok(row)
    }

    async fn list_media(&self, asset_id: DbId) -> Result<Vec<AssetMedia>, StoreError> {
        let t = self.tables.lock().await;
        Ok(t.media
            .values()
            .filter(|m| m.asset_id == asset_id)
            .cloned()
            .collect())
    }

    async fn delete_media(&self, asset_id: DbId, media_id: DbId) -> Result<bool, StoreError> {
        let mut t = self.tables.lock().await;
        let owned = t
            .media
            .get(&media_id)
            .is_some_and(|m| m.asset_id == asset_id);
        if owned {
            t.media.remove(&media_id);
        }
        Ok(owned)
    }

    async fn count_media(&self, asset_id: DbId) -> Result<i64, StoreError> {
        let t = self.tables.lock().await;
        Ok(t.media.values().filter(|m| m.asset_id == asset_id).count() as i64)
    }

    async fn list_assets(&self, query: &AssetQuery) -> Result<Vec<Asset>, StoreError> {
        let t = self.tables.lock().await;
        let mut matching: Vec<&Asset> = t.assets.values().filter(|a| query.matches(a)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn count_assets(&self, query: &AssetQuery) -> Result<i64, StoreError> {
        let t = self.tables.lock().await;
        Ok(t.assets.values().filter(|a| query.matches(a)).count() as i64)
    }

    async fn delete_asset(&self, id: DbId) -> Result<bool, StoreError> {
        let mut t = self.tables.lock().await;
        if t.assets.remove(&id).is_none() {
            return Ok(false);
        }
        t.performance.remove(&id);
        t.verifications.remove(&id);
        t.moderations.remove(&id);
        t.media.retain(|_, m| m.asset_id != id);
        Ok(true)
    }

    async fn record_audit(&self, entry: &NewAuditEntry) -> Result<AuditEntry, StoreError> {
        let mut t = self.tables.lock().await;
        let id = Tables::next_id(&mut t.next_audit_id);
        let row = AuditEntry {
            id,
            asset_id: entry.asset_id,
            actor_id: entry.actor_id,
            action: entry.action.clone(),
            from_status: entry.from_status.as_str().to_string(),
            to_status: entry.to_status.as_str().to_string(),
            comment: entry.comment.clone(),
            created_at: Utc::now(),
        };
        t.audit.push(row.clone());
        Ok(row)
    }

    async fn list_audit(&self, asset_id: DbId) -> Result<Vec<AuditEntry>, StoreError> {
        let t = self.tables.lock().await;
        Ok(t.audit
            .iter()
            .filter(|e| e.asset_id == asset_id)
            .cloned()
            .collect())
    }
}

/// Sub-record writes against a missing asset fail like a foreign key would.
fn ensure_asset(t: &Tables, asset_id: DbId) -> Result<(), StoreError> {
    if t.assets.contains_key(&asset_id) {
        Ok(())
    } else {
        Err(StoreError::Internal(format!("asset {asset_id} does not exist")))
    }
}

#[cfg(test)]
mod tests {
    use marketplace_core::asset::AssetType;
    use marketplace_core::verification::{FlagCode, Severity};

    use super::*;

    fn create_input(title: &str) -> CreateAsset {
        CreateAsset {
            owner_id: None,
            asset_type: AssetType::Saas,
            title: title.to_string(),
            short_description: String::new(),
            full_description: None,
            asking_price: 50_000.0,
            currency: None,
            monthly_revenue: None,
            monthly_profit: None,
            mrr: None,
            arr: None,
            churn_rate: None,
            cac: None,
            ltv: None,
            annual_growth_rate: None,
            website_url: None,
            performance: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_ids_and_defaults() {
        let store = InMemoryAssetStore::new();
        let a = store.insert_asset(1, "a", &create_input("A")).await.unwrap();
        let b = store.insert_asset(1, "b", &create_input("B")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.status, AssetStatus::Draft);
        assert_eq!(a.currency, DEFAULT_CURRENCY);
    }

    #[tokio::test]
    async fn duplicate_slug_is_unique_violation() {
        let store = InMemoryAssetStore::new();
        store.insert_asset(1, "dup", &create_input("Dup")).await.unwrap();
        let err = store
            .insert_asset(2, "dup", &create_input("Dup"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation_of(SLUG_CONSTRAINT));
    }

    #[tokio::test]
    async fn update_leaves_unset_fields_alone() {
        let store = InMemoryAssetStore::new();
        let a = store.insert_asset(1, "a", &create_input("A")).await.unwrap();
        let patch = UpdateAsset {
            mrr: Some(1_000.0),
            ..Default::default()
        };
        let updated = store.update_asset(a.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.mrr, Some(1_000.0));
        assert_eq!(updated.title, "A");
        assert_eq!(updated.asking_price, 50_000.0);
    }

    #[tokio::test]
    async fn delete_cascades_to_sub_records() {
        let store = InMemoryAssetStore::new();
        let a = store.insert_asset(1, "a", &create_input("A")).await.unwrap();
        store
            .add_media(
                a.id,
                &CreateMedia {
                    url: "https://example.com/s.png".into(),
                    kind: None,
                },
            )
            .await
            .unwrap();
        store
            .replace_verification(
                a.id,
                &[VerificationFlag {
                    code: FlagCode::MissingFinancials,
                    message: "none".into(),
                    severity: Severity::High,
                }],
            )
            .await
            .unwrap();

        assert!(store.delete_asset(a.id).await.unwrap());
        assert_eq!(store.count_media(a.id).await.unwrap(), 0);
        assert!(store.find_verification(a.id).await.unwrap().is_none());
        assert!(!store.delete_asset(a.id).await.unwrap());
    }

    #[tokio::test]
    async fn media_delete_is_scoped_to_asset() {
        let store = InMemoryAssetStore::new();
        let a = store.insert_asset(1, "a", &create_input("A")).await.unwrap();
        let b = store.insert_asset(1, "b", &create_input("B")).await.unwrap();
        let m = store
            .add_media(
                a.id,
                &CreateMedia {
                    url: "https://example.com/s.png".into(),
                    kind: Some("document".into()),
                },
            )
            .await
            .unwrap();
        assert!(!store.delete_media(b.id, m.id).await.unwrap());
        assert!(store.delete_media(a.id, m.id).await.unwrap());
    }

    #[tokio::test]
    async fn moderation_updates_status_and_keeps_latest() {
        let store = InMemoryAssetStore::new();
        let a = store.insert_asset(1, "a", &create_input("A")).await.unwrap();
        let decision = ModerationDecision {
            asset_id: a.id,
            reviewer_id: 99,
            comment: Some("first".into()),
            suggested_price_min: None,
            suggested_price_max: None,
            pricing_comment: None,
            decided_status: AssetStatus::Rejected,
        };
        store.record_moderation(&decision).await.unwrap();
        let (asset, moderation) = store
            .record_moderation(&ModerationDecision {
                comment: Some("second".into()),
                decided_status: AssetStatus::Approved,
                ..decision
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(asset.status, AssetStatus::Approved);
        assert_eq!(moderation.admin_status_comment.as_deref(), Some("second"));
        assert_eq!(
            store.find_moderation(a.id).await.unwrap().unwrap().decided_status,
            AssetStatus::Approved
        );
    }

    #[tokio::test]
    async fn moderation_of_missing_asset_writes_nothing() {
        let store = InMemoryAssetStore::new();
        let decision = ModerationDecision {
            asset_id: 42,
            reviewer_id: 1,
            comment: None,
            suggested_price_min: None,
            suggested_price_max: None,
            pricing_comment: None,
            decided_status: AssetStatus::Approved,
        };
        assert!(store.record_moderation(&decision).await.unwrap().is_none());
        assert!(store.find_moderation(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_paginates_newest_first() {
        let store = InMemoryAssetStore::new();
        for i in 0..5 {
            store
                .insert_asset(1, &format!("a-{i}"), &create_input("A"))
                .await
                .unwrap();
        }
        let query = AssetQuery {
            asset_type: None,
            status: None,
            owner_id: None,
            min_price: None,
            max_price: None,
            search: None,
            limit: 2,
            offset: 1,
        };
        let page = store.list_assets(&query).await.unwrap();
        let ids: Vec<DbId> = page.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![4, 3]);
        assert_eq!(store.count_assets(&query).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn sub_record_write_requires_asset() {
        let store = InMemoryAssetStore::new();
        let err = store
            .upsert_performance(7, &PerformanceInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Internal(_)));
    }
}
