//! Wizard working buffers

use chrono::{DateTime, Duration, Utc};
use mdist_common::{time, ReleaseStatus};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use crate::models::{ReleaseForm, WizardStep};

/// In-progress edit of one release
#[derive(Debug, Clone, Serialize)]
pub struct WizardSession {
    pub id: Uuid,
    pub owner: Uuid,
    /// Fresh id for a new release, otherwise the release being edited
    pub release_id: Uuid,
    /// Persisted status when editing an existing release
    pub existing_status: Option<ReleaseStatus>,
    pub current_step: WizardStep,
    /// Highest step reached; navigation may go back to any step up to here
    pub furthest_step: WizardStep,
    pub form: ReleaseForm,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WizardSession {
    pub fn new(owner: Uuid, release_id: Uuid, existing_status: Option<ReleaseStatus>, form: ReleaseForm) -> Self {
        // A release that already passed validation has every step completed
        let furthest_step = match existing_status {
            Some(status) if status != ReleaseStatus::Draft => WizardStep::Review,
            _ => WizardStep::Type,
        };
        let now = time::now();
        Self {
            id: Uuid::new_v4(),
            owner,
            release_id,
            existing_status,
            current_step: WizardStep::Type,
            furthest_step,
            form,
            created_at: now,
            updated_at: now,
        }
    }

    /// Tracks are frozen when editing a release that already left DRAFT
    pub fn tracks_locked(&self) -> bool {
        matches!(self.existing_status, Some(status) if status != ReleaseStatus::Draft)
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = time::now();
    }

    fn idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.updated_at < cutoff
    }
}

/// Sessions untouched for this long are abandoned
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Session store shared through `AppState`
///
/// Abandoned sessions are invisible to `get` once idle past the TTL and are
/// dropped by `purge_stale`.
#[derive(Debug, Clone)]
pub struct WizardSessions {
    inner: Arc<RwLock<HashMap<Uuid, WizardSession>>>,
    ttl: Duration,
}

impl Default for WizardSessions {
    fn default() -> Self {
        Self::with_ttl(Duration::hours(DEFAULT_SESSION_TTL_HOURS))
    }
}

impl WizardSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn insert(&self, session: WizardSession) {
        self.inner.write().await.insert(session.id, session);
    }

    pub async fn get(&self, id: Uuid) -> Option<WizardSession> {
        let cutoff = time::now() - self.ttl;
        self.inner
            .read()
            .await
            .get(&id)
            .filter(|s| !s.idle_since(cutoff))
            .cloned()
    }

    /// Drop every session idle since before `now - ttl`; returns how many
    pub async fn purge_stale(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.ttl;
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.idle_since(cutoff));
        before - sessions.len()
    }

    /// Background sweep calling `purge_stale` every `every`
    pub fn spawn_sweeper(&self, every: std::time::Duration) -> JoinHandle<()> {
        let sessions = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let purged = sessions.purge_stale(time::now()).await;
                if purged > 0 {
                    info!("Purged {} abandoned wizard sessions", purged);
                }
            }
        })
    }

    pub async fn remove(&self, id: Uuid) -> Option<WizardSession> {
        self.inner.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
