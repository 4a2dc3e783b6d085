//! Artist/writer library and notification endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::collaborators::NotificationRecord;
use crate::error::ApiResult;
use crate::models::{Actor, ArtistLibraryEntry, WriterLibraryEntry};
use crate::AppState;

/// GET /library/artists
pub async fn list_artists(
    State(state): State<AppState>,
    actor: Actor,
) -> ApiResult<Json<Vec<ArtistLibraryEntry>>> {
    Ok(Json(state.collaborators.library.list_artists(actor.user_id).await?))
}

/// GET /library/writers
pub async fn list_writers(
    State(state): State<AppState>,
    actor: Actor,
) -> ApiResult<Json<Vec<WriterLibraryEntry>>> {
    Ok(Json(state.collaborators.library.list_writers(actor.user_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// GET /notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<NotificationQuery>,
) -> ApiResult<Json<Vec<NotificationRecord>>> {
    let records = state
        .collaborators
        .notifier
        .list_for(actor.user_id, query.limit.clamp(1, 500))
        .await?;
    Ok(Json(records))
}
