//! External collaborators reached through narrow interfaces
//!
//! The workflow only depends on the traits here. Default implementations
//! write to local disk and the service database, and publish what they
//! record on the [`mdist_common::EventBus`].

pub mod assets;
pub mod audit;
pub mod identifiers;
pub mod notifier;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mdist_common::events::Notice;
use mdist_common::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub use assets::LocalAssetStore;
pub use audit::DbAuditLog;
pub use identifiers::RandomIdentifierGenerator;
pub use notifier::DbNotifier;

/// Recipient id for notices addressed to the admin review queue
pub const ADMIN_QUEUE_RECIPIENT: Uuid = Uuid::nil();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Audio,
    Image,
    Document,
}

impl AssetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Audio => "audio",
            AssetKind::Image => "image",
            AssetKind::Document => "document",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = mdist_common::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "audio" => Ok(AssetKind::Audio),
            "image" => Ok(AssetKind::Image),
            "document" => Ok(AssetKind::Document),
            other => Err(mdist_common::Error::InvalidInput(format!(
                "Unknown asset kind: {}",
                other
            ))),
        }
    }
}

/// Reference to stored bytes; releases keep only `url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub kind: AssetKind,
    pub url: String,
    pub size_bytes: u64,
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationRecord {
    pub id: i64,
    pub user_id: Uuid,
    pub notice: Notice,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminActionRecord {
    pub id: i64,
    pub actor_id: Uuid,
    pub action: String,
    pub target_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn upload_asset(&self, bytes: &[u8], kind: AssetKind) -> Result<AssetRef>;
}

/// Source of system-assigned catalog identifiers
pub trait IdentifierGenerator: Send + Sync {
    fn generate_wupc(&self) -> String;
    fn generate_isrc(&self) -> String;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user_id: Uuid, notice: Notice) -> Result<()>;

    async fn list_for(&self, user_id: Uuid, limit: i64) -> Result<Vec<NotificationRecord>>;
}

#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn log_admin_action(&self, actor_id: Uuid, action: &str, target_id: Uuid) -> Result<()>;

    async fn recent(&self, limit: i64) -> Result<Vec<AdminActionRecord>>;
}
