//! Admin audit trail rows

use chrono::{DateTime, Utc};
use mdist_common::{time, uuid_utils, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::collaborators::AdminActionRecord;

pub async fn record_admin_action(
    pool: &SqlitePool,
    actor_id: Uuid,
    action: &str,
    target_id: Uuid,
    at: DateTime<Utc>,
) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO admin_actions (actor_guid, action, target_guid, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(actor_id.to_string())
    .bind(action)
    .bind(target_id.to_string())
    .bind(at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Most recent first
pub async fn list_admin_actions(pool: &SqlitePool, limit: i64) -> Result<Vec<AdminActionRecord>> {
    let rows = sqlx::query(
        "SELECT id, actor_guid, action, target_guid, created_at FROM admin_actions
         ORDER BY id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<AdminActionRecord> {
            let actor_guid: String = row.try_get("actor_guid")?;
            let target_guid: String = row.try_get("target_guid")?;
            let created_at: String = row.try_get("created_at")?;
            Ok(AdminActionRecord {
                id: row.try_get("id")?,
                actor_id: uuid_utils::parse_column("admin_actions.actor_guid", &actor_guid)?,
                action: row.try_get("action")?,
                target_id: uuid_utils::parse_column("admin_actions.target_guid", &target_guid)?,
                created_at: time::parse_timestamp(&created_at)?,
            })
        })
        .collect()
}
