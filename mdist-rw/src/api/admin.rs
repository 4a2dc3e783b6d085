//! Admin review endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use uuid::Uuid;

use crate::collaborators::{AdminActionRecord, NotificationRecord, ADMIN_QUEUE_RECIPIENT};
use crate::error::{ApiError, ApiResult};
use crate::models::{Actor, Release, ReleaseForm};
use crate::services::{ReleasePage, ReviewQueue};
use crate::state_machine::TransitionError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub queue: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// GET /admin/releases?queue=pending|editing|takedown|all&page=N
pub async fn list_releases(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ReleasePage>> {
    let queue = match query.queue.as_deref() {
        None => ReviewQueue::default(),
        Some(name) => name
            .parse::<ReviewQueue>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
    };
    Ok(Json(state.admin.list(&actor, queue, query.page).await?))
}

/// POST /admin/releases/:id/approve
pub async fn approve(
    State(state): State<AppState>,
    actor: Actor,
    Path(release_id): Path<Uuid>,
) -> ApiResult<Json<Release>> {
    Ok(Json(state.admin.approve(&actor, release_id).await?))
}

/// POST /admin/releases/:id/reject
pub async fn reject(
    State(state): State<AppState>,
    actor: Actor,
    Path(release_id): Path<Uuid>,
    body: Option<Json<RejectRequest>>,
) -> ApiResult<Json<Release>> {
    let reason = body.map(|Json(request)| request.reason).unwrap_or_default();
    Ok(Json(state.admin.reject(&actor, release_id, &reason).await?))
}

/// POST /admin/releases/:id/takedown/confirm
pub async fn confirm_takedown(
    State(state): State<AppState>,
    actor: Actor,
    Path(release_id): Path<Uuid>,
) -> ApiResult<Json<Release>> {
    Ok(Json(state.admin.confirm_takedown(&actor, release_id).await?))
}

/// POST /admin/releases/:id/takedown/reject
pub async fn reject_takedown(
    State(state): State<AppState>,
    actor: Actor,
    Path(release_id): Path<Uuid>,
) -> ApiResult<Json<Release>> {
    Ok(Json(state.admin.reject_takedown(&actor, release_id).await?))
}

/// PUT /admin/releases/:id
pub async fn override_metadata(
    State(state): State<AppState>,
    actor: Actor,
    Path(release_id): Path<Uuid>,
    Json(form): Json<ReleaseForm>,
) -> ApiResult<Json<Release>> {
    Ok(Json(state.admin.override_metadata(&actor, release_id, form).await?))
}

/// DELETE /admin/releases/:id
pub async fn delete_release(
    State(state): State<AppState>,
    actor: Actor,
    Path(release_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.admin.delete(&actor, release_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /admin/actions?limit=N
pub async fn recent_actions(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<AdminActionRecord>>> {
    Ok(Json(state.admin.recent_actions(&actor, query.limit).await?))
}

/// GET /admin/notifications
///
/// Notices addressed to the review queue rather than a single user.
pub async fn queue_notifications(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<NotificationRecord>>> {
    require_admin(&actor, "notifications")?;
    let records = state
        .collaborators
        .notifier
        .list_for(ADMIN_QUEUE_RECIPIENT, query.limit.clamp(1, 500))
        .await?;
    Ok(Json(records))
}

/// GET /admin/events
///
/// Server-sent stream of every workflow event.
pub async fn event_stream(
    State(state): State<AppState>,
    actor: Actor,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    require_admin(&actor, "events")?;
    Ok(mdist_common::sse::create_event_sse_stream(
        "mdist-rw",
        &state.event_bus,
        |_| true,
    ))
}

fn require_admin(actor: &Actor, event: &'static str) -> ApiResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(TransitionError::ActorNotAuthorized { event }.into())
    }
}
