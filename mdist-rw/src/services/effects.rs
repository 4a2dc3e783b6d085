//! Post-transition side effects
//!
//! Effects run only after the transition they belong to has been
//! persisted. Every failure is logged and swallowed; none of them can undo
//! or block the status change.

use mdist_common::{time, MdistEvent};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{Collaborators, WorkflowResult};
use crate::collaborators::ADMIN_QUEUE_RECIPIENT;
use crate::models::{is_blank, Actor, Release, SocialLinks};
use crate::state_machine::{SideEffect, Transition, TransitionTarget};

/// Persist a transition, then publish it and dispatch its effects
///
/// Returns the stored release, or `None` when the release was removed.
pub async fn commit_transition(
    collab: &Collaborators,
    transition: Transition,
    actor: &Actor,
    first_persist: bool,
) -> WorkflowResult<Option<Release>> {
    let Transition {
        release,
        from,
        to,
        effects,
    } = transition;

    let stored = match to {
        TransitionTarget::Removed => {
            collab.releases.delete_release(release.id).await?;
            info!(release_id = %release.id, actor_id = %actor.user_id, "Release deleted");
            collab.event_bus.emit_lossy(MdistEvent::ReleaseDeleted {
                release_id: release.id,
                user_id: release.user_id,
                actor_id: actor.user_id,
                timestamp: time::now(),
            });
            None
        }
        TransitionTarget::Status(status) => {
            let saved = collab.releases.save_release(&release).await?;
            if first_persist || from != status {
                info!(
                    release_id = %saved.id,
                    from = %from,
                    to = %status,
                    actor_id = %actor.user_id,
                    "Release status changed"
                );
                collab.event_bus.emit_lossy(MdistEvent::ReleaseStatusChanged {
                    release_id: saved.id,
                    user_id: saved.user_id,
                    old_status: (!first_persist).then_some(from),
                    new_status: status,
                    actor_id: actor.user_id,
                    timestamp: time::now(),
                });
            }
            Some(saved)
        }
    };

    dispatch(collab, effects).await;
    Ok(stored)
}

/// Run side effects in order, logging failures
pub async fn dispatch(collab: &Collaborators, effects: Vec<SideEffect>) {
    for effect in effects {
        match effect {
            SideEffect::NotifyAdminQueue(notice) => {
                if let Err(e) = collab.notifier.notify(ADMIN_QUEUE_RECIPIENT, notice).await {
                    warn!(error = %e, "Failed to notify admin review queue");
                }
            }
            SideEffect::NotifyOwner { user_id, notice } => {
                if let Err(e) = collab.notifier.notify(user_id, notice).await {
                    warn!(user_id = %user_id, error = %e, "Failed to notify release owner");
                }
            }
            SideEffect::SyncSocialLinks { user_id, links } => {
                if let Err(e) = sync_social_links(collab, user_id, links).await {
                    warn!(user_id = %user_id, error = %e, "Social link sync failed");
                }
            }
            SideEffect::LogAdminAction {
                actor_id,
                action,
                target_id,
            } => {
                if let Err(e) = collab.audit.log_admin_action(actor_id, action, target_id).await {
                    warn!(action, target_id = %target_id, error = %e, "Failed to log admin action");
                }
            }
        }
    }
}

/// Copy links onto the profile only where the profile has none yet
async fn sync_social_links(
    collab: &Collaborators,
    user_id: Uuid,
    links: SocialLinks,
) -> mdist_common::Result<()> {
    let current = collab
        .users
        .load_profile(user_id)
        .await?
        .map(|profile| profile.links)
        .unwrap_or_default();

    let missing = SocialLinks {
        spotify_url: links
            .spotify_url
            .filter(|_| is_blank(current.spotify_url.as_deref())),
        apple_id: links.apple_id.filter(|_| is_blank(current.apple_id.as_deref())),
    };

    if missing.is_empty() {
        debug!(user_id = %user_id, "Profile already has social links");
        return Ok(());
    }

    collab.users.update_social_links(user_id, &missing).await?;
    info!(user_id = %user_id, "Synced social links from primary artist");
    collab.event_bus.emit_lossy(MdistEvent::SocialLinksSynced {
        user_id,
        spotify_url: missing.spotify_url,
        apple_id: missing.apple_id,
        timestamp: time::now(),
    });
    Ok(())
}

/// Record the release's credits in the owner's library, best effort
pub async fn remember_credits(collab: &Collaborators, release: &Release) {
    let artists: Vec<_> = release
        .tracks
        .iter()
        .flat_map(|t| t.artists.iter().cloned())
        .collect();
    let writers: Vec<_> = release
        .tracks
        .iter()
        .flat_map(|t| t.writers.iter().cloned())
        .collect();

    if let Err(e) = collab.library.upsert_artists(release.user_id, &artists).await {
        warn!(release_id = %release.id, error = %e, "Failed to update artist library");
    }
    if let Err(e) = collab.library.upsert_writers(release.user_id, &writers).await {
        warn!(release_id = %release.id, error = %e, "Failed to update writer library");
    }
}
