//! End-to-end release workflow tests over a real SQLite database
//!
//! Covers the submission wizard, admin review and takedown flows, including
//! the acceptance scenarios for producer, writer, clearance and date checks.

mod common;

use async_trait::async_trait;
use chrono::Duration;
use common::{complete_form, credited_track, Harness};
use mdist_common::events::Notice;
use mdist_common::{MdistEvent, ReleaseStatus};
use mdist_rw::collaborators::ADMIN_QUEUE_RECIPIENT;
use mdist_rw::models::{
    Actor, ArtistRole, CopyrightType, DocumentRef, Release, ReleaseForm, ReleaseTiming,
    SocialLinks, UserProfile, WizardStep,
};
use mdist_rw::repository::UserRepository;
use mdist_rw::services::{ReviewQueue, WorkflowError};
use mdist_rw::state_machine::TransitionError;
use mdist_rw::validators::ValidationError;
use std::sync::Arc;
use uuid::Uuid;

/// Run a fresh wizard session through submit
async fn submit_new(h: &Harness, owner: &Actor, form: ReleaseForm) -> Result<Release, WorkflowError> {
    let session = h.submission.begin(owner, None).await?;
    h.submission.update(owner, session.id, form).await?;
    h.submission.submit(owner, session.id).await
}

fn blocked_codes(err: WorkflowError) -> Vec<ValidationError> {
    match err {
        WorkflowError::SubmissionBlocked(items) => items.into_iter().map(|i| i.error).collect(),
        other => panic!("Expected SubmissionBlocked, got {:?}", other),
    }
}

async fn approved_release(h: &Harness, owner: &Actor, admin: &Actor) -> Release {
    let pending = submit_new(h, owner, complete_form()).await.unwrap();
    h.admin.approve(admin, pending.id).await.unwrap()
}

// =============================================================================
// Acceptance scenarios
// =============================================================================

#[tokio::test]
async fn test_missing_producer_blocks_until_credited() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());

    let mut form = complete_form();
    form.tracks[0].artists.retain(|a| a.role != ArtistRole::Producer);

    let session = h.submission.begin(&owner, None).await.unwrap();
    h.submission.update(&owner, session.id, form.clone()).await.unwrap();
    let err = h.submission.submit(&owner, session.id).await.unwrap_err();
    assert_eq!(blocked_codes(err), vec![ValidationError::MissingProducerCredit]);

    // Nothing persisted while blocked
    assert!(h.submission.own_releases(&owner).await.unwrap().is_empty());

    form.tracks[0] = credited_track("Night Transit");
    h.submission.update(&owner, session.id, form).await.unwrap();
    let release = h.submission.submit(&owner, session.id).await.unwrap();
    assert_eq!(release.status, ReleaseStatus::Pending);
}

#[tokio::test]
async fn test_instrumental_track_needs_no_writer() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());

    let mut form = complete_form();
    form.tracks[0].writers.clear();
    let track_id = form.tracks[0].id;

    let session = h.submission.begin(&owner, None).await.unwrap();
    h.submission.update(&owner, session.id, form.clone()).await.unwrap();
    let codes = blocked_codes(h.submission.submit(&owner, session.id).await.unwrap_err());
    assert!(matches!(
        codes.as_slice(),
        [ValidationError::MissingWriterCredit { track_id: id, position: 1, .. }] if *id == track_id
    ));

    form.tracks[0].is_instrumental = true;
    h.submission.update(&owner, session.id, form).await.unwrap();
    let release = h.submission.submit(&owner, session.id).await.unwrap();
    assert_eq!(release.status, ReleaseStatus::Pending);
}

#[tokio::test]
async fn test_takedown_lifecycle() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());
    let admin = Actor::admin(Uuid::new_v4());
    let approved = approved_release(&h, &owner, &admin).await;
    assert_eq!(approved.status, ReleaseStatus::Approved);

    let requested = h.submission.request_takedown(&owner, approved.id).await.unwrap();
    assert_eq!(requested.status, ReleaseStatus::TakedownRequested);

    let complete = h.admin.confirm_takedown(&admin, approved.id).await.unwrap();
    assert_eq!(complete.status, ReleaseStatus::TakedownComplete);

    let err = h.admin.reject_takedown(&admin, approved.id).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Transition(TransitionError::InvalidTransition {
            from: ReleaseStatus::TakedownComplete,
            ..
        })
    ));

    let owner_notices: Vec<_> = h
        .collab
        .notifier
        .list_for(owner.user_id, 10)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.notice)
        .collect();
    assert!(owner_notices
        .iter()
        .any(|n| matches!(n, Notice::TakedownCompleted { .. })));
}

#[tokio::test]
async fn test_declined_takedown_returns_to_approved() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());
    let admin = Actor::admin(Uuid::new_v4());
    let approved = approved_release(&h, &owner, &admin).await;

    h.submission.request_takedown(&owner, approved.id).await.unwrap();
    let restored = h.admin.reject_takedown(&admin, approved.id).await.unwrap();
    assert_eq!(restored.status, ReleaseStatus::Approved);
    assert_eq!(restored.wupc, approved.wupc);
}

#[tokio::test]
async fn test_licensed_track_needs_clearance_document() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());

    let mut form = complete_form();
    form.tracks[0].copyright_type = CopyrightType::Licensed;

    let session = h.submission.begin(&owner, None).await.unwrap();
    h.submission.update(&owner, session.id, form.clone()).await.unwrap();
    let codes = blocked_codes(h.submission.submit(&owner, session.id).await.unwrap_err());
    assert_eq!(codes, vec![ValidationError::MissingClearanceDocuments]);

    form.documents.push(DocumentRef {
        name: "sample-clearance.pdf".to_string(),
        url: "asset://document/clearance".to_string(),
    });
    h.submission.update(&owner, session.id, form).await.unwrap();
    let release = h.submission.submit(&owner, session.id).await.unwrap();
    assert_eq!(release.status, ReleaseStatus::Pending);
    assert_eq!(release.documents.len(), 1);
}

#[tokio::test]
async fn test_specific_release_date_needs_lead_time() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());
    let today = mdist_common::time::today();

    let mut form = complete_form();
    form.release_timing = ReleaseTiming::Specific;
    form.release_date = Some(today + Duration::days(1));

    let session = h.submission.begin(&owner, None).await.unwrap();
    h.submission.update(&owner, session.id, form.clone()).await.unwrap();
    let codes = blocked_codes(h.submission.submit(&owner, session.id).await.unwrap_err());
    assert_eq!(
        codes,
        vec![ValidationError::ReleaseDateTooSoon {
            earliest: today + Duration::days(common::MIN_LEAD_DAYS as i64)
        }]
    );

    form.release_date = Some(today + Duration::days(21));
    h.submission.update(&owner, session.id, form).await.unwrap();
    let release = h.submission.submit(&owner, session.id).await.unwrap();
    assert_eq!(release.release_date, Some(today + Duration::days(21)));
}

#[tokio::test]
async fn test_approval_syncs_primary_artist_links() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());
    let admin = Actor::admin(Uuid::new_v4());
    mdist_rw::db::users::upsert_profile(
        &h.pool,
        &UserProfile {
            user_id: owner.user_id,
            display_name: "Nova".to_string(),
            links: SocialLinks {
                spotify_url: None,
                apple_id: Some("existing-apple".to_string()),
            },
        },
    )
    .await
    .unwrap();

    let mut events = h.event_bus.subscribe();
    let approved = approved_release(&h, &owner, &admin).await;
    assert_eq!(approved.status, ReleaseStatus::Approved);

    let profile = h.collab.users.load_profile(owner.user_id).await.unwrap().unwrap();
    assert_eq!(
        profile.links.spotify_url.as_deref(),
        Some("https://open.spotify.com/artist/nova")
    );
    assert_eq!(profile.links.apple_id.as_deref(), Some("existing-apple"));

    let mut synced = false;
    while let Ok(event) = events.try_recv() {
        if let MdistEvent::SocialLinksSynced { user_id, .. } = event {
            synced = user_id == owner.user_id;
        }
    }
    assert!(synced, "Expected a SocialLinksSynced event");
}

/// Profile store that is always unavailable
struct UnavailableUsers;

#[async_trait]
impl UserRepository for UnavailableUsers {
    async fn load_profile(&self, _user_id: Uuid) -> mdist_common::Result<Option<UserProfile>> {
        Err(mdist_common::Error::Internal("profile store offline".to_string()))
    }

    async fn update_social_links(&self, _user_id: Uuid, _links: &SocialLinks) -> mdist_common::Result<()> {
        Err(mdist_common::Error::Internal("profile store offline".to_string()))
    }
}

#[tokio::test]
async fn test_link_sync_failure_does_not_block_approval() {
    let h = Harness::with_users(Some(Arc::new(UnavailableUsers))).await;
    let owner = Actor::artist(Uuid::new_v4());
    let admin = Actor::admin(Uuid::new_v4());

    let approved = approved_release(&h, &owner, &admin).await;
    assert_eq!(approved.status, ReleaseStatus::Approved);

    let stored = h.collab.releases.load_release(approved.id).await.unwrap();
    assert_eq!(stored.status, ReleaseStatus::Approved);

    let actions = h.admin.recent_actions(&admin, 10).await.unwrap();
    assert!(actions.iter().any(|a| a.action == "approve" && a.target_id == approved.id));
}

// =============================================================================
// Identifiers and edits
// =============================================================================

#[tokio::test]
async fn test_identifiers_assigned_on_submit() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());

    let mut form = complete_form();
    let mut second = credited_track("Second Stop");
    second.isrc = Some("USAAA2600001".to_string());
    form.tracks.push(second);

    let release = submit_new(&h, &owner, form).await.unwrap();
    let wupc = release.wupc.clone().unwrap();
    assert_eq!(wupc.len(), 13);
    assert!(wupc.starts_with('2'));
    assert!(release.tracks[0].isrc.as_deref().unwrap().starts_with("QZMD1"));
    assert_eq!(release.tracks[1].isrc.as_deref(), Some("USAAA2600001"));
}

#[tokio::test]
async fn test_edit_of_approved_release_keeps_wupc() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());
    let admin = Actor::admin(Uuid::new_v4());
    let approved = approved_release(&h, &owner, &admin).await;

    let session = h.submission.begin(&owner, Some(approved.id)).await.unwrap();
    assert_eq!(session.furthest_step, WizardStep::Review);

    let mut form = session.form.clone();
    form.genre = Some("Ambient".to_string());
    h.submission.update(&owner, session.id, form).await.unwrap();

    let editing = h.submission.submit(&owner, session.id).await.unwrap();
    assert_eq!(editing.status, ReleaseStatus::Editing);
    assert_eq!(editing.genre.as_deref(), Some("Ambient"));
    assert_eq!(editing.wupc, approved.wupc);
    assert_eq!(editing.tracks[0].isrc, approved.tracks[0].isrc);

    let page = h.admin.list(&admin, ReviewQueue::Editing, 1).await.unwrap();
    assert_eq!(page.total_results, 1);

    let reapproved = h.admin.approve(&admin, approved.id).await.unwrap();
    assert_eq!(reapproved.status, ReleaseStatus::Approved);
    assert_eq!(reapproved.wupc, approved.wupc);
}

#[tokio::test]
async fn test_tracks_locked_after_submission() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());
    let pending = submit_new(&h, &owner, complete_form()).await.unwrap();

    let session = h.submission.begin(&owner, Some(pending.id)).await.unwrap();
    let mut form = session.form.clone();
    form.tracks.push(credited_track("Bonus"));

    let err = h.submission.update(&owner, session.id, form).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Transition(TransitionError::TracksLocked)));
}

#[tokio::test]
async fn test_reject_then_resubmit() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());
    let admin = Actor::admin(Uuid::new_v4());
    let pending = submit_new(&h, &owner, complete_form()).await.unwrap();

    let err = h.admin.reject(&admin, pending.id, "   ").await.unwrap_err();
    assert!(matches!(err, WorkflowError::Transition(TransitionError::ReasonRequired)));

    let rejected = h.admin.reject(&admin, pending.id, " Cover art is blurry ").await.unwrap();
    assert_eq!(rejected.status, ReleaseStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Cover art is blurry"));

    let session = h.submission.begin(&owner, Some(pending.id)).await.unwrap();
    let mut form = session.form.clone();
    form.cover_url = Some("asset://image/sharper".to_string());
    h.submission.update(&owner, session.id, form).await.unwrap();
    let resubmitted = h.submission.submit(&owner, session.id).await.unwrap();

    assert_eq!(resubmitted.status, ReleaseStatus::Pending);
    assert_eq!(resubmitted.rejection_reason, None);
    assert_eq!(resubmitted.wupc, pending.wupc);
}

#[tokio::test]
async fn test_owner_cannot_clear_assigned_isrc() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());
    let admin = Actor::admin(Uuid::new_v4());
    let approved = approved_release(&h, &owner, &admin).await;
    let assigned = approved.tracks[0].isrc.clone();
    assert!(assigned.is_some());

    let session = h.submission.begin(&owner, Some(approved.id)).await.unwrap();
    let mut form = session.form.clone();
    form.tracks[0].isrc = None;
    h.submission.update(&owner, session.id, form).await.unwrap();
    let editing = h.submission.submit(&owner, session.id).await.unwrap();
    assert_eq!(editing.status, ReleaseStatus::Editing);
    assert_eq!(editing.tracks[0].isrc, assigned);

    let session = h.submission.begin(&owner, Some(approved.id)).await.unwrap();
    let mut form = session.form.clone();
    form.tracks[0].isrc = Some("GBXYZ2600099".to_string());
    h.submission.update(&owner, session.id, form).await.unwrap();
    h.submission.save_and_exit(&owner, session.id).await.unwrap();

    let reapproved = h.admin.approve(&admin, approved.id).await.unwrap();
    assert_eq!(reapproved.tracks[0].isrc, assigned);
}

#[tokio::test]
async fn test_save_and_exit_amends_pending_in_place() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());
    let pending = submit_new(&h, &owner, complete_form()).await.unwrap();

    let session = h.submission.begin(&owner, Some(pending.id)).await.unwrap();
    let mut form = session.form.clone();
    form.genre = None;
    h.submission.update(&owner, session.id, form).await.unwrap();
    let err = h.submission.save_and_exit(&owner, session.id).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Validation(ValidationError::IncompleteMetadata { field: "genre", track: None })
    ));

    let mut form = session.form.clone();
    form.genre = Some("Downtempo".to_string());
    h.submission.update(&owner, session.id, form).await.unwrap();
    let saved = h.submission.save_and_exit(&owner, session.id).await.unwrap();
    assert_eq!(saved.status, ReleaseStatus::Pending);
    assert_eq!(saved.genre.as_deref(), Some("Downtempo"));
    assert_eq!(saved.wupc, pending.wupc);
}

#[tokio::test]
async fn test_submit_keeps_pending_and_editing_status() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());
    let admin = Actor::admin(Uuid::new_v4());

    let pending = submit_new(&h, &owner, complete_form()).await.unwrap();
    let session = h.submission.begin(&owner, Some(pending.id)).await.unwrap();
    let mut form = session.form.clone();
    form.record_label = Some("Transit Tapes".to_string());
    h.submission.update(&owner, session.id, form).await.unwrap();
    let amended = h.submission.submit(&owner, session.id).await.unwrap();
    assert_eq!(amended.status, ReleaseStatus::Pending);
    assert_eq!(amended.record_label.as_deref(), Some("Transit Tapes"));

    let approved = h.admin.approve(&admin, pending.id).await.unwrap();
    let session = h.submission.begin(&owner, Some(approved.id)).await.unwrap();
    h.submission.update(&owner, session.id, session.form.clone()).await.unwrap();
    let editing = h.submission.submit(&owner, session.id).await.unwrap();
    assert_eq!(editing.status, ReleaseStatus::Editing);

    let session = h.submission.begin(&owner, Some(approved.id)).await.unwrap();
    let mut form = session.form.clone();
    form.sub_genre = Some("Ambient Dub".to_string());
    h.submission.update(&owner, session.id, form).await.unwrap();
    let still_editing = h.submission.submit(&owner, session.id).await.unwrap();
    assert_eq!(still_editing.status, ReleaseStatus::Editing);
    assert_eq!(still_editing.sub_genre.as_deref(), Some("Ambient Dub"));
}

#[tokio::test]
async fn test_takedown_states_cannot_be_edited() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());
    let admin = Actor::admin(Uuid::new_v4());
    let approved = approved_release(&h, &owner, &admin).await;

    h.submission.request_takedown(&owner, approved.id).await.unwrap();
    let err = h.submission.begin(&owner, Some(approved.id)).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Transition(TransitionError::InvalidTransition {
            from: ReleaseStatus::TakedownRequested,
            ..
        })
    ));

    h.admin.confirm_takedown(&admin, approved.id).await.unwrap();
    let err = h.submission.begin(&owner, Some(approved.id)).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Transition(TransitionError::InvalidTransition {
            from: ReleaseStatus::TakedownComplete,
            ..
        })
    ));
}

#[tokio::test]
async fn test_duplicate_track_ids_rejected() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());

    let mut form = complete_form();
    let repeated = form.tracks[0].clone();
    form.tracks.push(repeated);

    let session = h.submission.begin(&owner, None).await.unwrap();
    let err = h.submission.update(&owner, session.id, form).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Repository(mdist_common::Error::Conflict(_))
    ));
    assert!(h.submission.own_releases(&owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_track_ids_reused_by_another_owner() {
    let h = Harness::new().await;
    let first_owner = Actor::artist(Uuid::new_v4());
    let second_owner = Actor::artist(Uuid::new_v4());

    let form = complete_form();
    let mut copied = form.clone();
    copied.title = "Copied Transit".to_string();
    copied.tracks[0].title = "Copied Track".to_string();

    let first = submit_new(&h, &first_owner, form).await.unwrap();
    let second = submit_new(&h, &second_owner, copied).await.unwrap();
    assert_eq!(second.status, ReleaseStatus::Pending);

    let first_again = h.submission.release(&first_owner, first.id).await.unwrap();
    assert_eq!(first_again.tracks.len(), 1);
    assert_eq!(first_again.tracks[0].title, "Night Transit");
    assert_eq!(first_again.tracks[0].writers.len(), 1);
    let second_again = h.submission.release(&second_owner, second.id).await.unwrap();
    assert_eq!(second_again.tracks[0].title, "Copied Track");
}

// =============================================================================
// Drafts, wizard navigation and access
// =============================================================================

#[tokio::test]
async fn test_save_draft_requires_only_title() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());
    let admin = Actor::admin(Uuid::new_v4());

    let session = h.submission.begin(&owner, None).await.unwrap();
    let untitled = ReleaseForm::default();
    h.submission.update(&owner, session.id, untitled).await.unwrap();
    let err = h.submission.save_and_exit(&owner, session.id).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Transition(TransitionError::Validation(
            ValidationError::IncompleteMetadata { field: "title", .. }
        ))
    ));

    let form = ReleaseForm {
        title: "Work in Progress".to_string(),
        ..ReleaseForm::default()
    };
    h.submission.update(&owner, session.id, form).await.unwrap();
    let draft = h.submission.save_and_exit(&owner, session.id).await.unwrap();
    assert_eq!(draft.status, ReleaseStatus::Draft);
    assert_eq!(draft.wupc, None);

    // Session is closed after Save & Exit
    assert!(matches!(
        h.submission.session(&owner, session.id).await,
        Err(WorkflowError::SessionNotFound(_))
    ));

    let pending = h.admin.list(&admin, ReviewQueue::Pending, 1).await.unwrap();
    assert_eq!(pending.total_results, 0);
    let all = h.admin.list(&admin, ReviewQueue::All, 1).await.unwrap();
    assert_eq!(all.total_results, 1);
}

#[tokio::test]
async fn test_draft_resumes_and_submits() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());

    let session = h.submission.begin(&owner, None).await.unwrap();
    h.submission.update(&owner, session.id, complete_form()).await.unwrap();
    let draft = h.submission.save_and_exit(&owner, session.id).await.unwrap();

    let resumed = h.submission.begin(&owner, Some(draft.id)).await.unwrap();
    assert_eq!(resumed.furthest_step, WizardStep::Type);
    let submitted = h.submission.submit(&owner, resumed.id).await.unwrap();
    assert_eq!(submitted.id, draft.id);
    assert_eq!(submitted.status, ReleaseStatus::Pending);
    assert!(submitted.wupc.is_some());

    let queue = h.collab.notifier.list_for(ADMIN_QUEUE_RECIPIENT, 10).await.unwrap();
    assert!(queue
        .iter()
        .any(|n| matches!(&n.notice, Notice::ReviewRequested { release_id, .. } if *release_id == draft.id)));
}

#[tokio::test]
async fn test_step_navigation() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());

    let session = h.submission.begin(&owner, None).await.unwrap();
    let err = h.submission.advance(&owner, session.id).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Validation(ValidationError::IncompleteMetadata { field: "type", .. })
    ));

    let err = h
        .submission
        .go_to(&owner, session.id, WizardStep::Details)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::StepNotReachable { .. }));

    h.submission.update(&owner, session.id, complete_form()).await.unwrap();
    let moved = h.submission.advance(&owner, session.id).await.unwrap();
    assert_eq!(moved.current_step, WizardStep::Upload);
    let moved = h.submission.advance(&owner, session.id).await.unwrap();
    assert_eq!(moved.furthest_step, WizardStep::Metadata);

    let back = h
        .submission
        .go_to(&owner, session.id, WizardStep::Type)
        .await
        .unwrap();
    assert_eq!(back.current_step, WizardStep::Type);
    assert_eq!(back.furthest_step, WizardStep::Metadata);

    assert!(h.submission.review(&owner, session.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_other_artist_cannot_touch_release() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());
    let stranger = Actor::artist(Uuid::new_v4());
    let pending = submit_new(&h, &owner, complete_form()).await.unwrap();

    assert!(matches!(
        h.submission.release(&stranger, pending.id).await,
        Err(WorkflowError::Transition(TransitionError::ActorNotAuthorized { .. }))
    ));
    assert!(matches!(
        h.admin.approve(&stranger, pending.id).await,
        Err(WorkflowError::Transition(TransitionError::ActorNotAuthorized { .. }))
    ));
    assert!(matches!(
        h.submission.begin(&stranger, Some(pending.id)).await,
        Err(WorkflowError::Transition(TransitionError::ActorNotAuthorized { .. }))
    ));
}

#[tokio::test]
async fn test_admin_delete_and_override() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());
    let admin = Actor::admin(Uuid::new_v4());
    let pending = submit_new(&h, &owner, complete_form()).await.unwrap();

    let mut form = pending.to_form();
    form.record_label = Some("Transit Records".to_string());
    let overridden = h.admin.override_metadata(&admin, pending.id, form).await.unwrap();
    assert_eq!(overridden.status, ReleaseStatus::Pending);
    assert_eq!(overridden.record_label.as_deref(), Some("Transit Records"));
    assert_eq!(overridden.wupc, pending.wupc);

    h.admin.delete(&admin, pending.id).await.unwrap();
    assert!(matches!(
        h.submission.release(&owner, pending.id).await,
        Err(WorkflowError::NotFound(_))
    ));

    let actions: Vec<_> = h
        .admin
        .recent_actions(&admin, 10)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.action)
        .collect();
    assert!(actions.contains(&"override".to_string()));
    assert!(actions.contains(&"delete".to_string()));
}

#[tokio::test]
async fn test_submission_remembers_credits() {
    let h = Harness::new().await;
    let owner = Actor::artist(Uuid::new_v4());
    submit_new(&h, &owner, complete_form()).await.unwrap();

    let artists = h.collab.library.list_artists(owner.user_id).await.unwrap();
    assert!(artists.iter().any(|a| a.name == "Remy Desk"));
    let writers = h.collab.library.list_writers(owner.user_id).await.unwrap();
    assert_eq!(writers.len(), 1);
    assert_eq!(writers[0].legal_name.as_deref(), Some("Nora Lanford"));
}
