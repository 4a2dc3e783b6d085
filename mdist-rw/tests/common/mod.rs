//! Shared fixtures for mdist-rw integration tests

#![allow(dead_code)]

use mdist_common::db::init_database;
use mdist_common::EventBus;
use mdist_rw::collaborators::{DbAuditLog, DbNotifier, RandomIdentifierGenerator};
use mdist_rw::db::SqliteRepository;
use mdist_rw::models::{
    ArtistRole, Confirmations, ReleaseArtist, ReleaseForm, ReleaseType, Track, TrackWriter,
    WriterRole,
};
use mdist_rw::repository::UserRepository;
use mdist_rw::services::{AdminReview, Collaborators, SubmissionWorkflow, WizardSessions};
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;

pub const MIN_LEAD_DAYS: u32 = 20;

/// Fresh database in a temporary directory; keep the `TempDir` alive
pub async fn setup_db() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let pool = init_database(&dir.path().join("mdist.db"))
        .await
        .expect("Should initialize database");
    (dir, pool)
}

pub fn collaborators(pool: &SqlitePool, event_bus: &EventBus) -> Collaborators {
    let repository = Arc::new(SqliteRepository::new(pool.clone()));
    Collaborators {
        releases: repository.clone(),
        users: repository.clone(),
        library: repository,
        identifiers: Arc::new(RandomIdentifierGenerator::new("QZMD1")),
        notifier: Arc::new(DbNotifier::new(pool.clone(), event_bus.clone())),
        audit: Arc::new(DbAuditLog::new(pool.clone(), event_bus.clone())),
        event_bus: event_bus.clone(),
    }
}

/// Both controllers over the same collaborators
pub struct Harness {
    pub _dir: TempDir,
    pub pool: SqlitePool,
    pub event_bus: EventBus,
    pub collab: Collaborators,
    pub submission: SubmissionWorkflow,
    pub admin: AdminReview,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_users(None).await
    }

    /// Replace the user repository, e.g. with one that always fails
    pub async fn with_users(users: Option<Arc<dyn UserRepository>>) -> Self {
        let (dir, pool) = setup_db().await;
        let event_bus = EventBus::new(100);
        let mut collab = collaborators(&pool, &event_bus);
        if let Some(users) = users {
            collab.users = users;
        }
        let submission =
            SubmissionWorkflow::new(collab.clone(), WizardSessions::new(), MIN_LEAD_DAYS);
        let admin = AdminReview::new(collab.clone(), MIN_LEAD_DAYS);
        Self {
            _dir: dir,
            pool,
            event_bus,
            collab,
            submission,
            admin,
        }
    }
}

pub fn credited_track(title: &str) -> Track {
    let mut track = Track::new(title);
    track.file_url = Some(format!("asset://audio/{}", title.to_lowercase().replace(' ', "-")));
    track.artists.push(ReleaseArtist {
        name: "Nova Lane".to_string(),
        role: ArtistRole::PrimaryArtist,
        spotify_url: Some("https://open.spotify.com/artist/nova".to_string()),
        ..ReleaseArtist::default()
    });
    track.artists.push(ReleaseArtist {
        name: "Remy Desk".to_string(),
        role: ArtistRole::Producer,
        ..ReleaseArtist::default()
    });
    track.writers.push(TrackWriter {
        name: "Nova Lane".to_string(),
        legal_name: Some("Nora Lanford".to_string()),
        role: Some(WriterRole::Songwriter),
        share: Some(100.0),
    });
    track
}

/// A form that passes every submission check
pub fn complete_form() -> ReleaseForm {
    let mut form = ReleaseForm {
        title: "Night Transit".to_string(),
        release_type: Some(ReleaseType::Single),
        genre: Some("Electronic".to_string()),
        c_line: Some("2026 Nova Lane".to_string()),
        c_year: Some(2026),
        p_line: Some("2026 Nova Lane".to_string()),
        p_year: Some(2026),
        cover_url: Some("asset://image/cover".to_string()),
        tracks: vec![credited_track("Night Transit")],
        confirmations: Confirmations {
            rights: true,
            accuracy: true,
            commission: true,
            liability: true,
        },
        ..ReleaseForm::default()
    };
    form.selected_stores.insert("spotify".to_string());
    form.selected_stores.insert("apple_music".to_string());
    form
}
