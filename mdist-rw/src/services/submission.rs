//! Owner-facing submission wizard controller
//!
//! A session buffers edits to one release across the seven wizard steps.
//! Nothing reaches the database until Save & Exit or the final submit.

use mdist_common::ReleaseStatus;
use tracing::{debug, info};
use uuid::Uuid;

use super::effects::{commit_transition, remember_credits};
use super::wizard::{WizardSession, WizardSessions};
use super::{not_authorized, Collaborators, WorkflowError, WorkflowResult};
use crate::models::{Actor, Release, ReleaseForm, WizardStep};
use crate::repository::ReleaseFilter;
use crate::state_machine::{
    attempt_transition, check_track_lock, ReleaseEvent, TransitionContext, TransitionError,
};
use crate::validators::{self, ReviewItem, ValidationContext};

#[derive(Clone)]
pub struct SubmissionWorkflow {
    collab: Collaborators,
    sessions: WizardSessions,
    min_lead_days: u32,
}

impl SubmissionWorkflow {
    pub fn new(collab: Collaborators, sessions: WizardSessions, min_lead_days: u32) -> Self {
        Self {
            collab,
            sessions,
            min_lead_days,
        }
    }

    /// Open a wizard session for a new release or an existing one
    pub async fn begin(&self, actor: &Actor, release_id: Option<Uuid>) -> WorkflowResult<WizardSession> {
        let session = match release_id {
            None => WizardSession::new(actor.user_id, Uuid::new_v4(), None, ReleaseForm::default()),
            Some(id) => {
                let release = self.collab.releases.load_release(id).await?;
                if !actor.owns(&release) {
                    return Err(not_authorized("edit"));
                }
                ensure_editable(&release)?;
                WizardSession::new(actor.user_id, release.id, Some(release.status), release.to_form())
            }
        };

        debug!(session_id = %session.id, release_id = %session.release_id, "Wizard session started");
        self.sessions.insert(session.clone()).await;
        Ok(session)
    }

    pub async fn session(&self, actor: &Actor, session_id: Uuid) -> WorkflowResult<WizardSession> {
        let session = self
            .sessions
            .get(session_id)
            .await
            .ok_or(WorkflowError::SessionNotFound(session_id))?;
        if session.owner != actor.user_id {
            return Err(not_authorized("edit"));
        }
        Ok(session)
    }

    /// Replace the buffered form
    ///
    /// Rejected with `TracksLocked` when editing a release outside DRAFT and
    /// the track layout differs from the stored release, and with `Conflict`
    /// when two tracks share an id.
    pub async fn update(
        &self,
        actor: &Actor,
        session_id: Uuid,
        form: ReleaseForm,
    ) -> WorkflowResult<WizardSession> {
        let mut session = self.session(actor, session_id).await?;
        if let Some(track_id) = form.duplicate_track_id() {
            return Err(mdist_common::Error::Conflict(format!(
                "Track id {} appears more than once",
                track_id
            ))
            .into());
        }
        if session.tracks_locked() {
            let persisted = self.collab.releases.load_release(session.release_id).await?;
            let mut candidate = persisted.clone();
            candidate.apply_form(form.clone());
            check_track_lock(Some(&persisted), &candidate)?;
        }

        session.form = form;
        session.touch();
        self.sessions.insert(session.clone()).await;
        Ok(session)
    }

    /// Validate the current step and move to the next one
    pub async fn advance(&self, actor: &Actor, session_id: Uuid) -> WorkflowResult<WizardSession> {
        let mut session = self.session(actor, session_id).await?;
        let persisted = self.persisted(&session).await?;
        let candidate = build_candidate(&session, persisted.as_ref());
        let ctx = self.validation_context(persisted.as_ref());

        validators::validate_step(&candidate, &ctx, session.current_step)?;

        if let Some(next) = session.current_step.next() {
            session.current_step = next;
            session.furthest_step = session.furthest_step.max(next);
            session.touch();
            self.sessions.insert(session.clone()).await;
        }
        Ok(session)
    }

    /// Jump back to an already completed step
    pub async fn go_to(
        &self,
        actor: &Actor,
        session_id: Uuid,
        step: WizardStep,
    ) -> WorkflowResult<WizardSession> {
        let mut session = self.session(actor, session_id).await?;
        if step > session.furthest_step {
            return Err(WorkflowError::StepNotReachable {
                requested: step,
                furthest: session.furthest_step,
            });
        }

        session.current_step = step;
        session.touch();
        self.sessions.insert(session.clone()).await;
        Ok(session)
    }

    /// Collect-all review shown on the last step
    pub async fn review(&self, actor: &Actor, session_id: Uuid) -> WorkflowResult<Vec<ReviewItem>> {
        let session = self.session(actor, session_id).await?;
        let persisted = self.persisted(&session).await?;
        let candidate = build_candidate(&session, persisted.as_ref());
        Ok(validators::review(&candidate, &self.validation_context(persisted.as_ref())))
    }

    /// Save & Exit
    ///
    /// Drafts only need a title. A release that already left DRAFT keeps its
    /// status and must still pass validation (attestations excepted).
    pub async fn save_and_exit(&self, actor: &Actor, session_id: Uuid) -> WorkflowResult<Release> {
        let session = self.session(actor, session_id).await?;
        let persisted = self.persisted(&session).await?;
        let candidate = build_candidate(&session, persisted.as_ref());
        let ctx = self.validation_context(persisted.as_ref());

        let saved = match persisted.as_ref().map(|r| r.status) {
            None | Some(ReleaseStatus::Draft) => {
                let transition = attempt_transition(
                    candidate,
                    ReleaseEvent::SaveDraft,
                    actor,
                    &TransitionContext::new(ctx, persisted.as_ref()),
                )?;
                commit_transition(&self.collab, transition, actor, persisted.is_none())
                    .await?
                    .ok_or_else(|| WorkflowError::NotFound(format!("Release {}", session.release_id)))?
            }
            Some(_) => self.amend_in_place(candidate, persisted.as_ref(), &ctx).await?,
        };

        remember_credits(&self.collab, &saved).await;
        self.sessions.remove(session_id).await;
        info!(release_id = %saved.id, status = %saved.status, "Release saved");
        Ok(saved)
    }

    /// Final submit from the review step
    ///
    /// Runs every validator first and persists nothing if any fail. The
    /// event depends on the stored status: new or DRAFT submits, REJECTED
    /// resubmits, APPROVED enters EDITING, PENDING and EDITING are amended
    /// in place.
    pub async fn submit(&self, actor: &Actor, session_id: Uuid) -> WorkflowResult<Release> {
        let session = self.session(actor, session_id).await?;
        let persisted = self.persisted(&session).await?;
        let candidate = build_candidate(&session, persisted.as_ref());
        let ctx = self.validation_context(persisted.as_ref());

        let problems = validators::review(&candidate, &ctx);
        if !problems.is_empty() {
            debug!(
                release_id = %candidate.id,
                problems = problems.len(),
                "Submission blocked"
            );
            return Err(WorkflowError::SubmissionBlocked(problems));
        }

        let from = persisted.as_ref().map(|r| r.status);
        let event = match from {
            None | Some(ReleaseStatus::Draft) => ReleaseEvent::Submit,
            Some(ReleaseStatus::Rejected) => ReleaseEvent::Resubmit,
            Some(ReleaseStatus::Approved) => ReleaseEvent::Edit,
            Some(ReleaseStatus::Pending | ReleaseStatus::Editing) => {
                let saved = self.amend_in_place(candidate, persisted.as_ref(), &ctx).await?;
                remember_credits(&self.collab, &saved).await;
                self.sessions.remove(session_id).await;
                return Ok(saved);
            }
            Some(status) => {
                return Err(TransitionError::InvalidTransition {
                    from: status,
                    event: "edit",
                }
                .into())
            }
        };

        let mut transition = attempt_transition(
            candidate,
            event,
            actor,
            &TransitionContext::new(ctx, persisted.as_ref()),
        )?;

        if transition.from == ReleaseStatus::Draft {
            self.assign_identifiers(&mut transition.release);
        }

        let saved = commit_transition(&self.collab, transition, actor, persisted.is_none())
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("Release {}", session.release_id)))?;

        remember_credits(&self.collab, &saved).await;
        self.sessions.remove(session_id).await;
        info!(
            release_id = %saved.id,
            status = %saved.status,
            wupc = saved.wupc.as_deref().unwrap_or(""),
            "Release submitted"
        );
        Ok(saved)
    }

    /// Owner asks for an approved release to be taken down
    pub async fn request_takedown(&self, actor: &Actor, release_id: Uuid) -> WorkflowResult<Release> {
        let release = self.collab.releases.load_release(release_id).await?;
        let ctx = self.validation_context(Some(&release));
        let transition = attempt_transition(
            release.clone(),
            ReleaseEvent::RequestTakedown,
            actor,
            &TransitionContext::new(ctx, Some(&release)),
        )?;

        commit_transition(&self.collab, transition, actor, false)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("Release {}", release_id)))
    }

    pub async fn release(&self, actor: &Actor, release_id: Uuid) -> WorkflowResult<Release> {
        let release = self.collab.releases.load_release(release_id).await?;
        if !actor.can_view(&release) {
            return Err(not_authorized("view"));
        }
        Ok(release)
    }

    /// Owner dashboard, newest first
    pub async fn own_releases(&self, actor: &Actor) -> WorkflowResult<Vec<Release>> {
        Ok(self
            .collab
            .releases
            .list_releases(&ReleaseFilter::owned_by(actor.user_id))
            .await?)
    }

    async fn persisted(&self, session: &WizardSession) -> WorkflowResult<Option<Release>> {
        match session.existing_status {
            None => Ok(None),
            Some(_) => Ok(Some(self.collab.releases.load_release(session.release_id).await?)),
        }
    }

    /// Save a non-draft release without changing its status
    async fn amend_in_place(
        &self,
        candidate: Release,
        persisted: Option<&Release>,
        ctx: &ValidationContext,
    ) -> WorkflowResult<Release> {
        ensure_editable(&candidate)?;
        check_track_lock(persisted, &candidate)?;
        validators::validate_persisted(&candidate, ctx)?;

        let saved = self.collab.releases.save_release(&candidate).await?;
        info!(release_id = %saved.id, status = %saved.status, "Release amended");
        Ok(saved)
    }

    /// WUPC for the release and an ISRC for every track without one
    fn assign_identifiers(&self, release: &mut Release) {
        let identifiers = &self.collab.identifiers;
        if release.assign_wupc(|| identifiers.generate_wupc()) {
            debug!(release_id = %release.id, "Assigned WUPC");
        }
        for track in &mut release.tracks {
            if track.isrc.as_deref().map_or(true, |isrc| isrc.trim().is_empty()) {
                track.isrc = Some(identifiers.generate_isrc());
            }
        }
    }

    fn validation_context(&self, persisted: Option<&Release>) -> ValidationContext {
        let accepted = persisted
            .filter(|r| r.status != ReleaseStatus::Draft)
            .and_then(|r| r.release_date);
        ValidationContext::current(self.min_lead_days).with_accepted_date(accepted)
    }
}

/// Releases in a takedown state can no longer be edited
fn ensure_editable(release: &Release) -> Result<(), TransitionError> {
    match release.status {
        ReleaseStatus::TakedownRequested | ReleaseStatus::TakedownComplete => {
            Err(TransitionError::InvalidTransition {
                from: release.status,
                event: "edit",
            })
        }
        _ => Ok(()),
    }
}

/// Stored release with the buffered form applied, or a fresh draft
fn build_candidate(session: &WizardSession, persisted: Option<&Release>) -> Release {
    let mut candidate = match persisted {
        Some(release) => release.clone(),
        None => Release::new_draft(session.release_id, session.owner, session.created_at),
    };
    candidate.apply_form(session.form.clone());
    candidate
}
