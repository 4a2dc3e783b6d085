//! Notifications stored in the service database

use async_trait::async_trait;
use mdist_common::events::Notice;
use mdist_common::{time, EventBus, MdistEvent, Result};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use super::{NotificationRecord, Notifier};
use crate::db::notifications;

#[derive(Clone)]
pub struct DbNotifier {
    pool: SqlitePool,
    event_bus: EventBus,
}

impl DbNotifier {
    pub fn new(pool: SqlitePool, event_bus: EventBus) -> Self {
        Self { pool, event_bus }
    }
}

#[async_trait]
impl Notifier for DbNotifier {
    async fn notify(&self, user_id: Uuid, notice: Notice) -> Result<()> {
        let timestamp = time::now();
        let id = notifications::record_notification(&self.pool, user_id, &notice, timestamp).await?;
        debug!(notification_id = id, user_id = %user_id, "Recorded notification");

        self.event_bus.emit_lossy(MdistEvent::NotificationRecorded {
            user_id,
            notice,
            timestamp,
        });
        Ok(())
    }

    async fn list_for(&self, user_id: Uuid, limit: i64) -> Result<Vec<NotificationRecord>> {
        notifications::list_notifications(&self.pool, user_id, limit).await
    }
}
