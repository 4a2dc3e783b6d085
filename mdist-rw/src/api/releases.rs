//! Owner catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::{Actor, Release};
use crate::AppState;

/// GET /releases
pub async fn list_own(State(state): State<AppState>, actor: Actor) -> ApiResult<Json<Vec<Release>>> {
    Ok(Json(state.submission.own_releases(&actor).await?))
}

/// GET /releases/:id
pub async fn get_release(
    State(state): State<AppState>,
    actor: Actor,
    Path(release_id): Path<Uuid>,
) -> ApiResult<Json<Release>> {
    Ok(Json(state.submission.release(&actor, release_id).await?))
}

/// POST /releases/:id/takedown
pub async fn request_takedown(
    State(state): State<AppState>,
    actor: Actor,
    Path(release_id): Path<Uuid>,
) -> ApiResult<Json<Release>> {
    Ok(Json(state.submission.request_takedown(&actor, release_id).await?))
}
