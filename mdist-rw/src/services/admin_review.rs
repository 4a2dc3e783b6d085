//! Admin back-office controller

use mdist_common::ReleaseStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

use super::effects::{commit_transition, dispatch};
use super::{not_authorized, Collaborators, WorkflowError, WorkflowResult};
use crate::collaborators::AdminActionRecord;
use crate::models::{Actor, Release, ReleaseForm};
use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::repository::ReleaseFilter;
use crate::state_machine::{attempt_transition, ReleaseEvent, SideEffect, TransitionContext};
use crate::validators::ValidationContext;

/// Review queues offered to admins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewQueue {
    #[default]
    Pending,
    Editing,
    Takedown,
    /// Whole catalog
    All,
}

impl ReviewQueue {
    pub fn statuses(self) -> Vec<ReleaseStatus> {
        match self {
            ReviewQueue::Pending => vec![ReleaseStatus::Pending],
            ReviewQueue::Editing => vec![ReleaseStatus::Editing],
            ReviewQueue::Takedown => vec![ReleaseStatus::TakedownRequested],
            ReviewQueue::All => Vec::new(),
        }
    }
}

impl FromStr for ReviewQueue {
    type Err = mdist_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReviewQueue::Pending),
            "editing" => Ok(ReviewQueue::Editing),
            "takedown" => Ok(ReviewQueue::Takedown),
            "all" => Ok(ReviewQueue::All),
            other => Err(mdist_common::Error::InvalidInput(format!(
                "Unknown review queue: {}",
                other
            ))),
        }
    }
}

/// One page of an admin listing
#[derive(Debug, Clone, Serialize)]
pub struct ReleasePage {
    pub queue: ReviewQueue,
    pub total_results: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub releases: Vec<Release>,
}

#[derive(Clone)]
pub struct AdminReview {
    collab: Collaborators,
    min_lead_days: u32,
}

impl AdminReview {
    pub fn new(collab: Collaborators, min_lead_days: u32) -> Self {
        Self {
            collab,
            min_lead_days,
        }
    }

    pub async fn list(&self, actor: &Actor, queue: ReviewQueue, page: i64) -> WorkflowResult<ReleasePage> {
        require_admin(actor, "list")?;

        let filter = ReleaseFilter::with_statuses(&queue.statuses());
        let total_results = self.collab.releases.count_releases(&filter).await?;
        let pagination = calculate_pagination(total_results, page);
        let releases = self
            .collab
            .releases
            .list_releases(&filter.page(PAGE_SIZE, pagination.offset))
            .await?;

        Ok(ReleasePage {
            queue,
            total_results,
            page: pagination.page,
            page_size: PAGE_SIZE,
            total_pages: pagination.total_pages,
            releases,
        })
    }

    /// Approve a PENDING or EDITING release
    ///
    /// Social-link sync runs afterwards and cannot fail the approval.
    pub async fn approve(&self, actor: &Actor, release_id: Uuid) -> WorkflowResult<Release> {
        self.apply(actor, release_id, ReleaseEvent::Approve).await
    }

    pub async fn reject(&self, actor: &Actor, release_id: Uuid, reason: &str) -> WorkflowResult<Release> {
        self.apply(
            actor,
            release_id,
            ReleaseEvent::Reject {
                reason: reason.to_string(),
            },
        )
        .await
    }

    pub async fn confirm_takedown(&self, actor: &Actor, release_id: Uuid) -> WorkflowResult<Release> {
        self.apply(actor, release_id, ReleaseEvent::ConfirmTakedown).await
    }

    pub async fn reject_takedown(&self, actor: &Actor, release_id: Uuid) -> WorkflowResult<Release> {
        self.apply(actor, release_id, ReleaseEvent::RejectTakedown).await
    }

    /// Hard delete in any status
    pub async fn delete(&self, actor: &Actor, release_id: Uuid) -> WorkflowResult<()> {
        let release = self.collab.releases.load_release(release_id).await?;
        let transition = attempt_transition(
            release.clone(),
            ReleaseEvent::Delete,
            actor,
            &TransitionContext::new(self.validation_context(), Some(&release)),
        )?;
        commit_transition(&self.collab, transition, actor, false).await?;
        Ok(())
    }

    /// Direct metadata edit by a trusted admin
    ///
    /// Skips owner-side validation. Identity, WUPC, lifecycle fields and
    /// confirmations are never touched.
    pub async fn override_metadata(
        &self,
        actor: &Actor,
        release_id: Uuid,
        form: ReleaseForm,
    ) -> WorkflowResult<Release> {
        require_admin(actor, "override")?;

        let mut release = self.collab.releases.load_release(release_id).await?;
        release.apply_admin_override(form);
        let saved = self.collab.releases.save_release(&release).await?;
        info!(release_id = %saved.id, actor_id = %actor.user_id, "Admin metadata override");

        dispatch(
            &self.collab,
            vec![SideEffect::LogAdminAction {
                actor_id: actor.user_id,
                action: "override",
                target_id: saved.id,
            }],
        )
        .await;
        Ok(saved)
    }

    pub async fn recent_actions(&self, actor: &Actor, limit: i64) -> WorkflowResult<Vec<AdminActionRecord>> {
        require_admin(actor, "audit")?;
        Ok(self.collab.audit.recent(limit.clamp(1, PAGE_SIZE)).await?)
    }

    async fn apply(&self, actor: &Actor, release_id: Uuid, event: ReleaseEvent) -> WorkflowResult<Release> {
        let release = self.collab.releases.load_release(release_id).await?;
        let transition = attempt_transition(
            release.clone(),
            event,
            actor,
            &TransitionContext::new(self.validation_context(), Some(&release)),
        )?;

        commit_transition(&self.collab, transition, actor, false)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("Release {}", release_id)))
    }

    fn validation_context(&self) -> ValidationContext {
        ValidationContext::current(self.min_lead_days)
    }
}

fn require_admin(actor: &Actor, event: &'static str) -> WorkflowResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(not_authorized(event))
    }
}
