//! Repository for the `assets` table.

use marketplace_core::asset::AssetStatus;
use marketplace_core::types::DbId;
use sqlx::PgPool;

use crate::models::asset::{
    Asset, AssetQuery, CreateAsset, UpdateAsset, ValuationUpdate, DEFAULT_CURRENCY,
};

/// Column list shared across queries to avoid repetition.
pub(crate) const ASSET_COLUMNS: &str = "\
    id, slug, asset_type, status, owner_id, title, short_description, \
    full_description, asking_price, currency, suggested_min_price, \
    suggested_max_price, valuation_note, monthly_revenue, monthly_profit, \
    mrr, arr, churn_rate, cac, ltv, annual_growth_rate, website_url, \
    created_at, updated_at";

/// Provides CRUD and filtered listing for assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Insert a new draft asset under `slug`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        slug: &str,
        input: &CreateAsset,
    ) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets (
                slug, asset_type, status, owner_id, title, short_description,
                full_description, asking_price, currency, monthly_revenue,
                monthly_profit, mrr, arr, churn_rate, cac, ltv,
                annual_growth_rate, website_url
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
             RETURNING {ASSET_COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(slug)
            .bind(input.asset_type.as_str())
            .bind(AssetStatus::Draft.as_str())
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.short_description)
            .bind(input.full_description.as_deref())
            .bind(input.asking_price)
            .bind(input.currency.as_deref().unwrap_or(DEFAULT_CURRENCY))
            .bind(input.monthly_revenue)
            .bind(input.monthly_profit)
            .bind(input.mrr)
            .bind(input.arr)
            .bind(input.churn_rate)
            .bind(input.cac)
            .bind(input.ltv)
            .bind(input.annual_growth_rate)
            .bind(input.website_url.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Find an asset by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {ASSET_COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an asset by its slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {ASSET_COLUMNS} FROM assets WHERE slug = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether any asset already uses `slug`.
    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM assets WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    /// Update an asset. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET
                asset_type = COALESCE($2, asset_type),
                title = COALESCE($3, title),
                short_description = COALESCE($4, short_description),
                full_description = COALESCE($5, full_description),
                asking_price = COALESCE($6, asking_price),
                currency = COALESCE($7, currency),
                monthly_revenue = COALESCE($8, monthly_revenue),
                monthly_profit = COALESCE($9, monthly_profit),
                mrr = COALESCE($10, mrr),
                arr = COALESCE($11, arr),
                churn_rate = COALESCE($12, churn_rate),
                cac = COALESCE($13, cac),
                ltv = COALESCE($14, ltv),
                annual_growth_rate = COALESCE($15, annual_growth_rate),
                website_url = COALESCE($16, website_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {ASSET_COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(input.asset_type.map(|t| t.as_str()))
            .bind(input.title.as_deref())
            .bind(input.short_description.as_deref())
            .bind(input.full_description.as_deref())
            .bind(input.asking_price)
            .bind(input.currency.as_deref())
            .bind(input.monthly_revenue)
            .bind(input.monthly_profit)
            .bind(input.mrr)
            .bind(input.arr)
            .bind(input.churn_rate)
            .bind(input.cac)
            .bind(input.ltv)
            .bind(input.annual_growth_rate)
            .bind(input.website_url.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Set the lifecycle status.
    pub async fn set_status<'e, E>(
        executor: E,
        id: DbId,
        status: AssetStatus,
    ) -> Result<Option<Asset>, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE assets SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {ASSET_COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Overwrite the derived valuation columns. `None` clears a column.
    pub async fn set_valuation(
        pool: &PgPool,
        id: DbId,
        valuation: &ValuationUpdate,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET
                suggested_min_price = $2,
                suggested_max_price = $3,
                valuation_note = $4,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {ASSET_COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(valuation.suggested_min_price)
            .bind(valuation.suggested_max_price)
            .bind(valuation.valuation_note.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// List assets matching `params`, newest first.
    pub async fn list(pool: &PgPool, params: &AssetQuery) -> Result<Vec<Asset>, sqlx::Error> {
        let (where_clause, bind_idx) = filter_clause(params);
        let query = format!(
            "SELECT {ASSET_COLUMNS} FROM assets
             {where_clause}
             ORDER BY created_at DESC, id DESC
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Asset>(&query);

        // Bind dynamic parameters in the order `filter_clause` numbered them.
        if let Some(asset_type) = params.asset_type {
            q = q.bind(asset_type.as_str());
        }
        if let Some(status) = params.status {
            q = q.bind(status.as_str());
        }
        if let Some(owner_id) = params.owner_id {
            q = q.bind(owner_id);
        }
        if let Some(min_price) = params.min_price {
            q = q.bind(min_price);
        }
        if let Some(max_price) = params.max_price {
            q = q.bind(max_price);
        }
        if let Some(ref search) = params.search {
            q = q.bind(format!("%{search}%"));
        }

        q.bind(params.limit).bind(params.offset).fetch_all(pool).await
    }

    /// Count assets matching `params`, ignoring pagination.
    pub async fn count(pool: &PgPool, params: &AssetQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, _) = filter_clause(params);
        let query = format!("SELECT COUNT(*) FROM assets {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query);

        if let Some(asset_type) = params.asset_type {
            q = q.bind(asset_type.as_str());
        }
        if let Some(status) = params.status {
            q = q.bind(status.as_str());
        }
        if let Some(owner_id) = params.owner_id {
            q = q.bind(owner_id);
        }
        if let Some(min_price) = params.min_price {
            q = q.bind(min_price);
        }
        if let Some(max_price) = params.max_price {
            q = q.bind(max_price);
        }
        if let Some(ref search) = params.search {
            q = q.bind(format!("%{search}%"));
        }

        q.fetch_one(pool).await
    }

    /// Delete an asset by ID. Sub-records go with it via `ON DELETE CASCADE`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Build the `WHERE` clause for `params`, returning it with the next free
/// bind index.
fn filter_clause(params: &AssetQuery) -> (String, u32) {
    let mut conditions = Vec::new();
    let mut bind_idx = 1u32;

    if params.asset_type.is_some() {
        conditions.push(format!("asset_type = ${bind_idx}"));
        bind_idx += 1;
    }
    if params.status.is_some() {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
    }
    if params.owner_id.is_some() {
        conditions.push(format!("owner_id = ${bind_idx}"));
        bind_idx += 1;
    }
    if params.min_price.is_some() {
        conditions.push(format!("asking_price >= ${bind_idx}"));
        bind_idx += 1;
    }
    if params.max_price.is_some() {
        conditions.push(format!("asking_price <= ${bind_idx}"));
        bind_idx += 1;
    }
    if params.search.is_some() {
        conditions.push(format!(
            "(title ILIKE ${bind_idx} OR short_description ILIKE ${bind_idx} \
             OR full_description ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (where_clause, bind_idx)
}
