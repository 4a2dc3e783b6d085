//! HTTP error responses for mdist-rw
//!
//! Every error renders as `{"error": {"code", "message", "details"?}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

use crate::services::WorkflowError;
use crate::state_machine::TransitionError;
use crate::validators::{ReviewItem, ValidationError};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed actor headers (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Common(#[from] mdist_common::Error),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Workflow(WorkflowError::Validation(err))
    }
}

impl From<TransitionError> for ApiError {
    fn from(err: TransitionError) -> Self {
        ApiError::Workflow(WorkflowError::Transition(err))
    }
}

struct ErrorBody {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<Value>,
}

impl ErrorBody {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

fn validation_body(err: ValidationError) -> ErrorBody {
    let message = err.to_string();
    let details = serde_json::to_value(ReviewItem::from(err)).unwrap_or(Value::Null);
    ErrorBody::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_FAILED", message).with_details(details)
}

fn transition_body(err: TransitionError) -> ErrorBody {
    let message = err.to_string();
    match err {
        TransitionError::Validation(inner) => validation_body(inner),
        TransitionError::InvalidTransition { .. } => {
            ErrorBody::new(StatusCode::CONFLICT, "INVALID_TRANSITION", message)
        }
        TransitionError::ActorNotAuthorized { .. } => {
            ErrorBody::new(StatusCode::FORBIDDEN, "ACTOR_NOT_AUTHORIZED", message)
        }
        TransitionError::ReasonRequired => {
            ErrorBody::new(StatusCode::BAD_REQUEST, "REASON_REQUIRED", message)
        }
        TransitionError::TracksLocked => ErrorBody::new(StatusCode::CONFLICT, "TRACKS_LOCKED", message),
    }
}

fn common_body(err: mdist_common::Error) -> ErrorBody {
    match err {
        mdist_common::Error::NotFound(what) => {
            ErrorBody::new(StatusCode::NOT_FOUND, "NOT_FOUND", format!("Not found: {}", what))
        }
        mdist_common::Error::InvalidInput(msg) => ErrorBody::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
        mdist_common::Error::Conflict(msg) => ErrorBody::new(StatusCode::CONFLICT, "CONFLICT", msg),
        other => {
            error!("Internal error: {}", other);
            ErrorBody::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", other.to_string())
        }
    }
}

fn workflow_body(err: WorkflowError) -> ErrorBody {
    let message = err.to_string();
    match err {
        WorkflowError::Validation(inner) => validation_body(inner),
        WorkflowError::Transition(inner) => transition_body(inner),
        WorkflowError::SubmissionBlocked(items) => {
            ErrorBody::new(StatusCode::UNPROCESSABLE_ENTITY, "SUBMISSION_BLOCKED", message)
                .with_details(serde_json::to_value(items).unwrap_or(Value::Null))
        }
        WorkflowError::NotFound(_) | WorkflowError::SessionNotFound(_) => {
            ErrorBody::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
        }
        WorkflowError::StepNotReachable { .. } => {
            ErrorBody::new(StatusCode::BAD_REQUEST, "STEP_NOT_REACHABLE", message)
        }
        WorkflowError::Asset(_) => ErrorBody::new(StatusCode::BAD_REQUEST, "ASSET_ERROR", message),
        WorkflowError::Repository(inner) => common_body(inner),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self {
            ApiError::Unauthorized(msg) => ErrorBody::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            ApiError::BadRequest(msg) => ErrorBody::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Workflow(err) => workflow_body(err),
            ApiError::Common(err) => common_body(err),
        };

        let mut error = json!({
            "code": body.code,
            "message": body.message,
        });
        if let Some(details) = body.details {
            error["details"] = details;
        }

        (body.status, Json(json!({ "error": error }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
