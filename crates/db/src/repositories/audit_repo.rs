//! Repository for the `asset_audit_log` table.

use marketplace_core::types::DbId;
use sqlx::PgPool;

use crate::models::asset::{AuditEntry, NewAuditEntry};

const COLUMNS: &str =
    "id, asset_id, actor_id, action, from_status, to_status, comment, created_at";

/// Append-only log of admin status changes.
pub struct AuditRepo;

impl AuditRepo {
    pub async fn create(pool: &PgPool, entry: &NewAuditEntry) -> Result<AuditEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO asset_audit_log
                (asset_id, actor_id, action, from_status, to_status, comment)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditEntry>(&query)
            .bind(entry.asset_id)
            .bind(entry.actor_id)
            .bind(&entry.action)
            .bind(entry.from_status.as_str())
            .bind(entry.to_status.as_str())
            .bind(entry.comment.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Audit entries for an asset, oldest first.
    pub async fn list_by_asset(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Vec<AuditEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM asset_audit_log WHERE asset_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, AuditEntry>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await
    }
}
