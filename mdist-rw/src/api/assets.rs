//! Asset upload endpoint

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

use crate::collaborators::{AssetKind, AssetRef};
use crate::error::{ApiError, ApiResult};
use crate::models::Actor;
use crate::services::WorkflowError;
use crate::AppState;

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// POST /assets/:kind
///
/// Raw request body; responds with the reference to store on the release.
pub async fn upload(
    State(state): State<AppState>,
    actor: Actor,
    Path(kind): Path<String>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<AssetRef>)> {
    let kind: AssetKind = kind.parse().map_err(|e: mdist_common::Error| ApiError::BadRequest(e.to_string()))?;

    let asset = state.assets.upload_asset(&body, kind).await.map_err(|e| {
        warn!(user_id = %actor.user_id, kind = %kind, error = %e, "Asset upload failed");
        match e {
            mdist_common::Error::InvalidInput(msg) => ApiError::Workflow(WorkflowError::Asset(msg)),
            other => ApiError::Common(other),
        }
    })?;

    Ok((StatusCode::CREATED, Json(asset)))
}
