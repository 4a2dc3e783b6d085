//! Submission wizard endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Actor, Release, ReleaseForm, WizardStep};
use crate::services::WizardSession;
use crate::validators::ReviewItem;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct BeginRequest {
    /// Existing release to edit; omitted for a new release
    #[serde(default)]
    pub release_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub ready: bool,
    pub items: Vec<ReviewItem>,
}

/// POST /wizard
pub async fn begin(
    State(state): State<AppState>,
    actor: Actor,
    body: Option<Json<BeginRequest>>,
) -> ApiResult<Json<WizardSession>> {
    let release_id = body.and_then(|Json(request)| request.release_id);
    Ok(Json(state.submission.begin(&actor, release_id).await?))
}

/// GET /wizard/:session
pub async fn get_session(
    State(state): State<AppState>,
    actor: Actor,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<WizardSession>> {
    Ok(Json(state.submission.session(&actor, session_id).await?))
}

/// PUT /wizard/:session
pub async fn update_session(
    State(state): State<AppState>,
    actor: Actor,
    Path(session_id): Path<Uuid>,
    Json(form): Json<ReleaseForm>,
) -> ApiResult<Json<WizardSession>> {
    Ok(Json(state.submission.update(&actor, session_id, form).await?))
}

/// POST /wizard/:session/advance
pub async fn advance(
    State(state): State<AppState>,
    actor: Actor,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<WizardSession>> {
    Ok(Json(state.submission.advance(&actor, session_id).await?))
}

/// POST /wizard/:session/goto/:step
///
/// `step` is a name (`details`) or a number (`3`).
pub async fn go_to(
    State(state): State<AppState>,
    actor: Actor,
    Path((session_id, step)): Path<(Uuid, String)>,
) -> ApiResult<Json<WizardSession>> {
    let step: WizardStep = step.parse().map_err(|e: mdist_common::Error| ApiError::BadRequest(e.to_string()))?;
    Ok(Json(state.submission.go_to(&actor, session_id, step).await?))
}

/// POST /wizard/:session/save
pub async fn save_and_exit(
    State(state): State<AppState>,
    actor: Actor,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<Release>> {
    Ok(Json(state.submission.save_and_exit(&actor, session_id).await?))
}

/// GET /wizard/:session/review
pub async fn review(
    State(state): State<AppState>,
    actor: Actor,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<ReviewResponse>> {
    let items = state.submission.review(&actor, session_id).await?;
    Ok(Json(ReviewResponse {
        ready: items.is_empty(),
        items,
    }))
}

/// POST /wizard/:session/submit
pub async fn submit(
    State(state): State<AppState>,
    actor: Actor,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<Release>> {
    Ok(Json(state.submission.submit(&actor, session_id).await?))
}
