//! Notification rows

use chrono::{DateTime, Utc};
use mdist_common::events::Notice;
use mdist_common::{time, uuid_utils, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::collaborators::NotificationRecord;

pub async fn record_notification(
    pool: &SqlitePool,
    user_id: Uuid,
    notice: &Notice,
    at: DateTime<Utc>,
) -> Result<i64> {
    let result = sqlx::query("INSERT INTO notifications (user_guid, notice, created_at) VALUES (?, ?, ?)")
        .bind(user_id.to_string())
        .bind(serde_json::to_string(notice)?)
        .bind(at.to_rfc3339())
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Newest first
pub async fn list_notifications(
    pool: &SqlitePool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<NotificationRecord>> {
    let rows = sqlx::query(
        "SELECT id, user_guid, notice, created_at FROM notifications
         WHERE user_guid = ? ORDER BY id DESC LIMIT ?",
    )
    .bind(user_id.to_string())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<NotificationRecord> {
            let user_guid: String = row.try_get("user_guid")?;
            let notice: String = row.try_get("notice")?;
            let created_at: String = row.try_get("created_at")?;
            Ok(NotificationRecord {
                id: row.try_get("id")?,
                user_id: uuid_utils::parse_column("notifications.user_guid", &user_guid)?,
                notice: serde_json::from_str(&notice)?,
                created_at: time::parse_timestamp(&created_at)?,
            })
        })
        .collect()
}
