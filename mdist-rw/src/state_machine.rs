//! Release lifecycle state machine
//!
//! [`attempt_transition`] is the only place a release's status changes. It
//! is pure: it checks the actor, the (state, event) pair and the guards,
//! then returns the updated release together with the side effects the
//! caller should dispatch once the result is persisted.
//!
//! | From               | Event            | To                 | Actor |
//! |--------------------|------------------|--------------------|-------|
//! | DRAFT              | SaveDraft        | DRAFT              | owner |
//! | DRAFT              | Submit           | PENDING            | owner |
//! | PENDING, EDITING   | Approve          | APPROVED           | admin |
//! | PENDING, EDITING   | Reject           | REJECTED           | admin |
//! | REJECTED           | Resubmit         | PENDING            | owner |
//! | APPROVED           | RequestTakedown  | TAKEDOWN_REQUESTED | owner |
//! | APPROVED           | Edit             | EDITING            | owner |
//! | TAKEDOWN_REQUESTED | ConfirmTakedown  | TAKEDOWN_COMPLETE  | admin |
//! | TAKEDOWN_REQUESTED | RejectTakedown   | APPROVED           | admin |
//! | any                | Delete           | (removed)          | admin |

use mdist_common::events::Notice;
use mdist_common::ReleaseStatus;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{is_blank, Actor, Release, SocialLinks};
use crate::validators::{self, checks, ValidationContext, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseEvent {
    SaveDraft,
    Submit,
    Approve,
    Reject { reason: String },
    Resubmit,
    RequestTakedown,
    Edit,
    ConfirmTakedown,
    RejectTakedown,
    Delete,
}

impl ReleaseEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ReleaseEvent::SaveDraft => "save_draft",
            ReleaseEvent::Submit => "submit",
            ReleaseEvent::Approve => "approve",
            ReleaseEvent::Reject { .. } => "reject",
            ReleaseEvent::Resubmit => "resubmit",
            ReleaseEvent::RequestTakedown => "request_takedown",
            ReleaseEvent::Edit => "edit",
            ReleaseEvent::ConfirmTakedown => "confirm_takedown",
            ReleaseEvent::RejectTakedown => "reject_takedown",
            ReleaseEvent::Delete => "delete",
        }
    }

    pub fn is_admin_event(&self) -> bool {
        matches!(
            self,
            ReleaseEvent::Approve
                | ReleaseEvent::Reject { .. }
                | ReleaseEvent::ConfirmTakedown
                | ReleaseEvent::RejectTakedown
                | ReleaseEvent::Delete
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Cannot {event} a release in {from} status")]
    InvalidTransition {
        from: ReleaseStatus,
        event: &'static str,
    },

    #[error("Actor is not authorized to {event} this release")]
    ActorNotAuthorized { event: &'static str },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A rejection reason is required")]
    ReasonRequired,

    #[error("Tracks and audio are locked once a release leaves DRAFT")]
    TracksLocked,
}

/// Where the release ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransitionTarget {
    Status(ReleaseStatus),
    Removed,
}

/// Work for collaborators, dispatched after the transition is persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    NotifyAdminQueue(Notice),
    NotifyOwner { user_id: Uuid, notice: Notice },
    SyncSocialLinks { user_id: Uuid, links: SocialLinks },
    LogAdminAction {
        actor_id: Uuid,
        action: &'static str,
        target_id: Uuid,
    },
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub release: Release,
    pub from: ReleaseStatus,
    pub to: TransitionTarget,
    pub effects: Vec<SideEffect>,
}

/// Validation inputs plus the persisted version of the release, if any
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    pub validation: ValidationContext,
    pub previous: Option<&'a Release>,
}

impl<'a> TransitionContext<'a> {
    pub fn new(validation: ValidationContext, previous: Option<&'a Release>) -> Self {
        Self { validation, previous }
    }
}

/// Tracks of a release outside DRAFT may not be added, removed, reordered
/// or have their audio replaced
pub fn check_track_lock(previous: Option<&Release>, candidate: &Release) -> Result<(), TransitionError> {
    match previous {
        Some(previous) if previous.status != ReleaseStatus::Draft => {
            if previous.same_track_layout(candidate) {
                Ok(())
            } else {
                Err(TransitionError::TracksLocked)
            }
        }
        _ => Ok(()),
    }
}

/// Apply `event` to `release` on behalf of `actor`
///
/// `release.status` must be the persisted status. On error nothing is
/// changed; the caller still holds its own copy of the persisted release.
pub fn attempt_transition(
    mut release: Release,
    event: ReleaseEvent,
    actor: &Actor,
    ctx: &TransitionContext<'_>,
) -> Result<Transition, TransitionError> {
    let event_name = event.name();
    let authorized = if event.is_admin_event() {
        actor.is_admin()
    } else {
        actor.owns(&release)
    };
    if !authorized {
        return Err(TransitionError::ActorNotAuthorized { event: event_name });
    }

    let from = release.status;
    let notice_ids = (release.id, release.title.clone());
    let mut effects = Vec::new();

    let to = match (from, event) {
        (_, ReleaseEvent::Delete) => {
            effects.push(admin_log(actor, "delete", &release));
            TransitionTarget::Removed
        }

        (ReleaseStatus::Draft, ReleaseEvent::SaveDraft) => {
            if release.title.trim().is_empty() {
                return Err(ValidationError::IncompleteMetadata {
                    field: "title",
                    track: None,
                }
                .into());
            }
            TransitionTarget::Status(ReleaseStatus::Draft)
        }

        (ReleaseStatus::Draft, ReleaseEvent::Submit) => {
            validators::validate_for_submit(&release, &ctx.validation)?;
            effects.push(SideEffect::NotifyAdminQueue(Notice::ReviewRequested {
                release_id: notice_ids.0,
                title: notice_ids.1,
            }));
            TransitionTarget::Status(ReleaseStatus::Pending)
        }

        (ReleaseStatus::Pending | ReleaseStatus::Editing, ReleaseEvent::Approve) => {
            require_attestations(&release)?;
            effects.push(SideEffect::NotifyOwner {
                user_id: release.user_id,
                notice: Notice::ReleaseApproved {
                    release_id: notice_ids.0,
                    title: notice_ids.1,
                },
            });
            if let Some(links) = primary_artist_links(&release) {
                effects.push(SideEffect::SyncSocialLinks {
                    user_id: release.user_id,
                    links,
                });
            }
            effects.push(admin_log(actor, "approve", &release));
            TransitionTarget::Status(ReleaseStatus::Approved)
        }

        (ReleaseStatus::Pending | ReleaseStatus::Editing, ReleaseEvent::Reject { reason }) => {
            let reason = reason.trim();
            if reason.is_empty() {
                return Err(TransitionError::ReasonRequired);
            }
            release.rejection_reason = Some(reason.to_string());
            effects.push(SideEffect::NotifyOwner {
                user_id: release.user_id,
                notice: Notice::ReleaseRejected {
                    release_id: notice_ids.0,
                    title: notice_ids.1,
                    reason: reason.to_string(),
                },
            });
            effects.push(admin_log(actor, "reject", &release));
            TransitionTarget::Status(ReleaseStatus::Rejected)
        }

        (ReleaseStatus::Rejected, ReleaseEvent::Resubmit) => {
            check_track_lock(ctx.previous, &release)?;
            validators::validate_for_submit(&release, &ctx.validation)?;
            effects.push(SideEffect::NotifyAdminQueue(Notice::ReviewRequested {
                release_id: notice_ids.0,
                title: notice_ids.1,
            }));
            TransitionTarget::Status(ReleaseStatus::Pending)
        }

        (ReleaseStatus::Approved, ReleaseEvent::RequestTakedown) => {
            effects.push(SideEffect::NotifyAdminQueue(Notice::TakedownReviewRequested {
                release_id: notice_ids.0,
                title: notice_ids.1,
            }));
            TransitionTarget::Status(ReleaseStatus::TakedownRequested)
        }

        (ReleaseStatus::Approved, ReleaseEvent::Edit) => {
            check_track_lock(ctx.previous, &release)?;
            validators::validate_for_submit(&release, &ctx.validation)?;
            effects.push(SideEffect::NotifyAdminQueue(Notice::EditReviewRequested {
                release_id: notice_ids.0,
                title: notice_ids.1,
            }));
            TransitionTarget::Status(ReleaseStatus::Editing)
        }

        (ReleaseStatus::TakedownRequested, ReleaseEvent::ConfirmTakedown) => {
            effects.push(SideEffect::NotifyOwner {
                user_id: release.user_id,
                notice: Notice::TakedownCompleted {
                    release_id: notice_ids.0,
                    title: notice_ids.1,
                },
            });
            effects.push(admin_log(actor, "confirm_takedown", &release));
            TransitionTarget::Status(ReleaseStatus::TakedownComplete)
        }

        (ReleaseStatus::TakedownRequested, ReleaseEvent::RejectTakedown) => {
            require_attestations(&release)?;
            effects.push(SideEffect::NotifyOwner {
                user_id: release.user_id,
                notice: Notice::TakedownDeclined {
                    release_id: notice_ids.0,
                    title: notice_ids.1,
                },
            });
            effects.push(admin_log(actor, "reject_takedown", &release));
            TransitionTarget::Status(ReleaseStatus::Approved)
        }

        (from, _) => {
            return Err(TransitionError::InvalidTransition {
                from,
                event: event_name,
            })
        }
    };

    if let TransitionTarget::Status(status) = to {
        if status != ReleaseStatus::Rejected {
            release.rejection_reason = None;
        }
        release.status = status;
    }

    Ok(Transition {
        release,
        from,
        to,
        effects,
    })
}

fn require_attestations(release: &Release) -> Result<(), ValidationError> {
    match checks::attestations(release).into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn admin_log(actor: &Actor, action: &'static str, release: &Release) -> SideEffect {
    SideEffect::LogAdminAction {
        actor_id: actor.user_id,
        action,
        target_id: release.id,
    }
}

/// Links on the primary artist worth offering to the owner's profile
fn primary_artist_links(release: &Release) -> Option<SocialLinks> {
    let artist = release.primary_artist()?;
    let links = SocialLinks {
        spotify_url: non_blank(artist.spotify_url.as_deref()),
        apple_id: non_blank(artist.apple_id.as_deref()),
    };
    (!links.is_empty()).then_some(links)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    if is_blank(value) {
        None
    } else {
        value.map(|v| v.trim().to_string())
    }
}
