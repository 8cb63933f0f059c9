//! Integration tests for the PostgreSQL asset store.
//!
//! Require `DATABASE_URL` to point at a disposable database; run with
//! `cargo test -p marketplace-db -- --ignored`.

use marketplace_core::asset::{AssetStatus, AssetType};
use marketplace_core::verification::{FlagCode, Severity, VerificationFlag};
use marketplace_db::models::asset::{
    AssetQuery, CreateAsset, CreateMedia, ModerationDecision, PerformanceInput, UpdateAsset,
    ValuationUpdate, SLUG_CONSTRAINT,
};
use marketplace_db::repositories::PgAssetStore;
use marketplace_db::store::AssetStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_asset(title: &str) -> CreateAsset {
    CreateAsset {
        owner_id: None,
        asset_type: AssetType::Saas,
        title: title.to_string(),
        short_description: "Short".to_string(),
        full_description: None,
        asking_price: 100_000.0,
        currency: None,
        monthly_revenue: Some(5_000.0),
        monthly_profit: None,
        mrr: None,
        arr: None,
        churn_rate: Some(3.0),
        cac: None,
        ltv: None,
        annual_growth_rate: None,
        website_url: Some("https://example.com".to_string()),
        performance: None,
    }
}

fn all_assets() -> AssetQuery {
    AssetQuery {
        asset_type: None,
        status: None,
        owner_id: None,
        min_price: None,
        max_price: None,
        search: None,
        limit: 20,
        offset: 0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn insert_and_find_round_trip(pool: PgPool) {
    let store = PgAssetStore::new(pool);
    let created = store.insert_asset(7, "my-saas", &new_asset("My SaaS")).await.unwrap();

    assert_eq!(created.status, AssetStatus::Draft);
    assert_eq!(created.currency, "USD");

    let by_slug = store.find_by_slug("my-saas").await.unwrap().unwrap();
    assert_eq!(by_slug.id, created.id);
    assert!(store.slug_exists("my-saas").await.unwrap());
    assert!(!store.slug_exists("my-saas-1").await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn duplicate_slug_maps_to_unique_violation(pool: PgPool) {
    let store = PgAssetStore::new(pool);
    store.insert_asset(1, "taken", &new_asset("Taken")).await.unwrap();
    let err = store.insert_asset(2, "taken", &new_asset("Taken")).await.unwrap_err();
    assert!(err.is_unique_violation_of(SLUG_CONSTRAINT));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn update_and_valuation_columns(pool: PgPool) {
    let store = PgAssetStore::new(pool);
    let a = store.insert_asset(1, "a", &new_asset("A")).await.unwrap();

    let patch = UpdateAsset {
        mrr: Some(10_000.0),
        ..Default::default()
    };
    let updated = store.update_asset(a.id, &patch).await.unwrap().unwrap();
    assert_eq!(updated.mrr, Some(10_000.0));
    assert_eq!(updated.monthly_revenue, Some(5_000.0));

    let valued = store
        .set_valuation(
            a.id,
            &ValuationUpdate {
                suggested_min_price: Some(1.0),
                suggested_max_price: Some(2.0),
                valuation_note: Some("note".into()),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(valued.suggested_max_price, Some(2.0));

    let cleared = store
        .set_valuation(a.id, &ValuationUpdate::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cleared.suggested_min_price, None);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn sub_records_upsert_and_cascade(pool: PgPool) {
    let store = PgAssetStore::new(pool);
    let a = store.insert_asset(1, "a", &new_asset("A")).await.unwrap();

    store
        .upsert_performance(
            a.id,
            &PerformanceInput {
                monthly_visitors: Some(100),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let perf = store
        .upsert_performance(a.id, &PerformanceInput::default())
        .await
        .unwrap();
    assert_eq!(perf.monthly_visitors, None);

    let flags = vec![VerificationFlag {
        code: FlagCode::MissingProof,
        message: "no media".into(),
        severity: Severity::Medium,
    }];
    store.replace_verification(a.id, &flags).await.unwrap();
    let stored = store.find_verification(a.id).await.unwrap().unwrap();
    assert_eq!(stored.flags, flags);

    store
        .add_media(
            a.id,
            &CreateMedia {
                url: "https://example.com/1.png".into(),
                kind: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(store.count_media(a.id).await.unwrap(), 1);

    assert!(store.delete_asset(a.id).await.unwrap());
    assert!(store.find_performance(a.id).await.unwrap().is_none());
    assert!(store.find_verification(a.id).await.unwrap().is_none());
    assert_eq!(store.count_media(a.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn moderation_is_written_with_status(pool: PgPool) {
    let store = PgAssetStore::new(pool);
    let a = store.insert_asset(1, "a", &new_asset("A")).await.unwrap();

    let (asset, moderation) = store
        .record_moderation(&ModerationDecision {
            asset_id: a.id,
            reviewer_id: 99,
            comment: Some("looks good".into()),
            suggested_price_min: Some(80_000.0),
            suggested_price_max: Some(120_000.0),
            pricing_comment: None,
            decided_status: AssetStatus::Approved,
        })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(asset.status, AssetStatus::Approved);
    assert_eq!(moderation.admin_reviewer_id, 99);
    assert_eq!(moderation.decided_status, AssetStatus::Approved);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn list_filters_and_counts(pool: PgPool) {
    let store = PgAssetStore::new(pool);
    let a = store.insert_asset(1, "a", &new_asset("Plumbing SaaS")).await.unwrap();
    store.insert_asset(2, "b", &new_asset("Newsletter")).await.unwrap();
    store.set_status(a.id, AssetStatus::Published).await.unwrap();

    let published = AssetQuery {
        status: Some(AssetStatus::Published),
        ..all_assets()
    };
    let items = store.list_assets(&published).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, a.id);

    let search = AssetQuery {
        search: Some("plumbing".into()),
        ..all_assets()
    };
    assert_eq!(store.count_assets(&search).await.unwrap(), 1);
    assert_eq!(store.count_assets(&all_assets()).await.unwrap(), 2);
}
