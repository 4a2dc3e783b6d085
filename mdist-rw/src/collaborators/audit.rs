//! Admin audit trail

use async_trait::async_trait;
use mdist_common::{time, EventBus, MdistEvent, Result};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use super::{AdminActionRecord, AuditLog};
use crate::db::admin_actions;

#[derive(Clone)]
pub struct DbAuditLog {
    pool: SqlitePool,
    event_bus: EventBus,
}

impl DbAuditLog {
    pub fn new(pool: SqlitePool, event_bus: EventBus) -> Self {
        Self { pool, event_bus }
    }
}

#[async_trait]
impl AuditLog for DbAuditLog {
    async fn log_admin_action(&self, actor_id: Uuid, action: &str, target_id: Uuid) -> Result<()> {
        let timestamp = time::now();
        admin_actions::record_admin_action(&self.pool, actor_id, action, target_id, timestamp).await?;
        info!(actor_id = %actor_id, action, target_id = %target_id, "Admin action");

        self.event_bus.emit_lossy(MdistEvent::AdminActionLogged {
            actor_id,
            action: action.to_string(),
            target_id,
            timestamp,
        });
        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<AdminActionRecord>> {
        admin_actions::list_admin_actions(&self.pool, limit).await
    }
}
