//! mdist-rw library - Release Workflow module
//!
//! Owns the release submission wizard, the review state machine and the
//! admin back office for the mdist distribution catalog.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use mdist_common::EventBus;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod collaborators;
pub mod db;
pub mod error;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod services;
pub mod settings;
pub mod state_machine;
pub mod validators;

use collaborators::{AssetStore, DbAuditLog, DbNotifier, IdentifierGenerator, LocalAssetStore};
use db::SqliteRepository;
use services::{AdminReview, Collaborators, SubmissionWorkflow, WizardSessions};
use settings::RuntimeSettings;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Workflow event broadcaster (SSE fan-out)
    pub event_bus: EventBus,
    /// Open wizard buffers
    pub sessions: WizardSessions,
    pub collaborators: Collaborators,
    pub assets: Arc<dyn AssetStore>,
    pub submission: SubmissionWorkflow,
    pub admin: AdminReview,
    pub settings: RuntimeSettings,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// State backed by the SQLite repositories and database-backed notifier/audit log
    pub fn new(
        db: SqlitePool,
        event_bus: EventBus,
        settings: RuntimeSettings,
        identifiers: Arc<dyn IdentifierGenerator>,
        assets: LocalAssetStore,
    ) -> Self {
        let repository = Arc::new(SqliteRepository::new(db.clone()));
        let collaborators = Collaborators {
            releases: repository.clone(),
            users: repository.clone(),
            library: repository,
            identifiers,
            notifier: Arc::new(DbNotifier::new(db.clone(), event_bus.clone())),
            audit: Arc::new(DbAuditLog::new(db.clone(), event_bus.clone())),
            event_bus: event_bus.clone(),
        };
        Self::with_collaborators(db, collaborators, Arc::new(assets), settings)
    }

    /// State with caller-supplied collaborators
    pub fn with_collaborators(
        db: SqlitePool,
        collaborators: Collaborators,
        assets: Arc<dyn AssetStore>,
        settings: RuntimeSettings,
    ) -> Self {
        let sessions = WizardSessions::new();
        let submission = SubmissionWorkflow::new(
            collaborators.clone(),
            sessions.clone(),
            settings.release_min_lead_days,
        );
        let admin = AdminReview::new(collaborators.clone(), settings.release_min_lead_days);

        Self {
            db,
            event_bus: collaborators.event_bus.clone(),
            sessions,
            collaborators,
            assets,
            submission,
            admin,
            settings,
            startup_time: mdist_common::time::now(),
        }
    }
}

/// Build application router
///
/// `/health` needs no actor headers; every other route extracts an
/// [`models::Actor`] and rejects the request with 401 without one.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};

    let wizard = Router::new()
        .route("/wizard", post(api::wizard::begin))
        .route(
            "/wizard/:session",
            get(api::wizard::get_session).put(api::wizard::update_session),
        )
        .route("/wizard/:session/advance", post(api::wizard::advance))
        .route("/wizard/:session/goto/:step", post(api::wizard::go_to))
        .route("/wizard/:session/save", post(api::wizard::save_and_exit))
        .route("/wizard/:session/review", get(api::wizard::review))
        .route("/wizard/:session/submit", post(api::wizard::submit));

    let catalog = Router::new()
        .route("/releases", get(api::releases::list_own))
        .route("/releases/:id", get(api::releases::get_release))
        .route("/releases/:id/takedown", post(api::releases::request_takedown))
        .route("/library/artists", get(api::library::list_artists))
        .route("/library/writers", get(api::library::list_writers))
        .route("/notifications", get(api::library::list_notifications))
        .route(
            "/assets/:kind",
            post(api::assets::upload).layer(DefaultBodyLimit::max(api::assets::MAX_UPLOAD_BYTES)),
        );

    let admin = Router::new()
        .route("/admin/releases", get(api::admin::list_releases))
        .route(
            "/admin/releases/:id",
            put(api::admin::override_metadata).delete(api::admin::delete_release),
        )
        .route("/admin/releases/:id/approve", post(api::admin::approve))
        .route("/admin/releases/:id/reject", post(api::admin::reject))
        .route(
            "/admin/releases/:id/takedown/confirm",
            post(api::admin::confirm_takedown),
        )
        .route(
            "/admin/releases/:id/takedown/reject",
            post(api::admin::reject_takedown),
        )
        .route("/admin/actions", get(api::admin::recent_actions))
        .route("/admin/notifications", get(api::admin::queue_notifications))
        .route("/admin/events", get(api::admin::event_stream));

    Router::new()
        .merge(wizard)
        .merge(catalog)
        .merge(admin)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
