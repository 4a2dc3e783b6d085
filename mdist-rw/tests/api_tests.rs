//! Integration tests for mdist-rw HTTP endpoints
//!
//! Tests cover:
//! - Health endpoint (no actor headers required)
//! - Actor header extraction
//! - Wizard submit and admin review over HTTP
//! - Error body codes and status mapping
//! - Asset upload
//! - Admin event stream

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common::{complete_form, setup_db};
use futures::StreamExt;
use mdist_common::EventBus;
use mdist_rw::api::{ROLE_HEADER, USER_HEADER};
use mdist_rw::collaborators::{LocalAssetStore, RandomIdentifierGenerator};
use mdist_rw::models::ReleaseForm;
use mdist_rw::settings::RuntimeSettings;
use mdist_rw::{build_router, AppState};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method
use uuid::Uuid;

/// Test helper: app over a fresh database; keep the `TempDir` alive
async fn setup_app() -> (TempDir, Router) {
    let (dir, pool) = setup_db().await;
    let state = AppState::new(
        pool,
        EventBus::new(100),
        RuntimeSettings::default(),
        Arc::new(RandomIdentifierGenerator::new("QZMD1")),
        LocalAssetStore::new(dir.path().join("assets")),
    );
    (dir, build_router(state))
}

struct Caller {
    user_id: Uuid,
    role: &'static str,
}

impl Caller {
    fn artist() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            role: "artist",
        }
    }

    fn admin() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            role: "admin",
        }
    }

    fn request(&self, method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(USER_HEADER, self.user_id.to_string())
            .header(ROLE_HEADER, self.role);
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Should parse JSON")
    };
    (status, body)
}

/// Open a wizard session, fill it and submit; returns the submit response
async fn submit_via_wizard(app: &Router, owner: &Caller, form: ReleaseForm) -> (StatusCode, Value) {
    let (status, session) = call(app, owner.request("POST", "/wizard", None)).await;
    assert_eq!(status, StatusCode::OK);
    let session_id = session["id"].as_str().unwrap().to_string();

    let form = serde_json::to_value(form).unwrap();
    let (status, _) = call(
        app,
        owner.request("PUT", &format!("/wizard/{}", session_id), Some(form)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    call(
        app,
        owner.request("POST", &format!("/wizard/{}/submit", session_id), None),
    )
    .await
}

// =============================================================================
// Health and identity
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_no_actor_required() {
    let (_dir, app) = setup_app().await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "mdist-rw");
    assert_eq!(body["database"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_missing_actor_headers_rejected() {
    let (_dir, app) = setup_app().await;

    let request = Request::builder()
        .uri("/releases")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_unknown_role_rejected() {
    let (_dir, app) = setup_app().await;
    let caller = Caller {
        user_id: Uuid::new_v4(),
        role: "superuser",
    };

    let (status, _) = call(&app, caller.request("GET", "/releases", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Submission and review
// =============================================================================

#[tokio::test]
async fn test_submit_and_approve_over_http() {
    let (_dir, app) = setup_app().await;
    let owner = Caller::artist();
    let admin = Caller::admin();

    let (status, release) = submit_via_wizard(&app, &owner, complete_form()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(release["status"], "PENDING");
    assert!(release["wupc"].is_string());
    let release_id = release["id"].as_str().unwrap().to_string();

    let (status, page) = call(
        &app,
        admin.request("GET", "/admin/releases?queue=pending&page=1", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_results"], 1);
    assert_eq!(page["page_size"], 100);

    let (status, approved) = call(
        &app,
        admin.request("POST", &format!("/admin/releases/{}/approve", release_id), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "APPROVED");

    let (status, own) = call(&app, owner.request("GET", "/releases", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(own.as_array().unwrap().len(), 1);

    let (status, notices) = call(&app, owner.request("GET", "/notifications", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(notices[0]["notice"]["kind"], "release_approved");

    let (status, actions) = call(&app, admin.request("GET", "/admin/actions", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(actions[0]["action"], "approve");
}

#[tokio::test]
async fn test_blocked_submit_lists_every_problem() {
    let (_dir, app) = setup_app().await;
    let owner = Caller::artist();

    let mut form = complete_form();
    form.genre = None;
    form.confirmations.rights = false;

    let (status, body) = submit_via_wizard(&app, &owner, form).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "SUBMISSION_BLOCKED");

    let details = body["error"]["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0]["step"], "details");
    assert_eq!(details[0]["error"]["code"], "INCOMPLETE_METADATA");
    assert_eq!(details[1]["error"]["code"], "ATTESTATION_INCOMPLETE");
}

#[tokio::test]
async fn test_artist_cannot_use_admin_routes() {
    let (_dir, app) = setup_app().await;
    let owner = Caller::artist();

    let (_, release) = submit_via_wizard(&app, &owner, complete_form()).await;
    let release_id = release["id"].as_str().unwrap();

    let (status, body) = call(
        &app,
        owner.request("POST", &format!("/admin/releases/{}/approve", release_id), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "ACTOR_NOT_AUTHORIZED");

    let (status, _) = call(&app, owner.request("GET", "/admin/releases", None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_reject_requires_reason() {
    let (_dir, app) = setup_app().await;
    let owner = Caller::artist();
    let admin = Caller::admin();

    let (_, release) = submit_via_wizard(&app, &owner, complete_form()).await;
    let uri = format!("/admin/releases/{}/reject", release["id"].as_str().unwrap());

    let (status, body) = call(&app, admin.request("POST", &uri, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "REASON_REQUIRED");

    let reason = serde_json::json!({ "reason": "Missing liner notes" });
    let (status, rejected) = call(&app, admin.request("POST", &uri, Some(reason))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["status"], "REJECTED");
    assert_eq!(rejected["rejection_reason"], "Missing liner notes");
}

#[tokio::test]
async fn test_invalid_transition_is_conflict() {
    let (_dir, app) = setup_app().await;
    let owner = Caller::artist();

    let (_, release) = submit_via_wizard(&app, &owner, complete_form()).await;
    let uri = format!("/releases/{}/takedown", release["id"].as_str().unwrap());

    let (status, body) = call(&app, owner.request("POST", &uri, None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_admin_list_rejects_unknown_queue() {
    let (_dir, app) = setup_app().await;
    let admin = Caller::admin();

    let (status, body) = call(
        &app,
        admin.request("GET", "/admin/releases?queue=archived", None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_admin_delete_returns_no_content() {
    let (_dir, app) = setup_app().await;
    let owner = Caller::artist();
    let admin = Caller::admin();

    let (_, release) = submit_via_wizard(&app, &owner, complete_form()).await;
    let release_id = release["id"].as_str().unwrap();

    let (status, _) = call(
        &app,
        admin.request("DELETE", &format!("/admin/releases/{}", release_id), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(
        &app,
        owner.request("GET", &format!("/releases/{}", release_id), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_goto_unreached_step() {
    let (_dir, app) = setup_app().await;
    let owner = Caller::artist();

    let (_, session) = call(&app, owner.request("POST", "/wizard", None)).await;
    let uri = format!("/wizard/{}/goto/review", session["id"].as_str().unwrap());

    let (status, body) = call(&app, owner.request("POST", &uri, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "STEP_NOT_REACHABLE");
}

// =============================================================================
// Assets
// =============================================================================

#[tokio::test]
async fn test_asset_upload() {
    let (_dir, app) = setup_app().await;
    let owner = Caller::artist();

    let request = Request::builder()
        .method("POST")
        .uri("/assets/audio")
        .header(USER_HEADER, owner.user_id.to_string())
        .header(ROLE_HEADER, owner.role)
        .body(Body::from(vec![1u8, 2, 3, 4]))
        .unwrap();
    let (status, asset) = call(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(asset["url"].as_str().unwrap().starts_with("asset://audio/"));
    assert_eq!(asset["size_bytes"], 4);

    let (status, body) = call(&app, owner.request("POST", "/assets/audio", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "ASSET_ERROR");

    let (status, _) = call(&app, owner.request("POST", "/assets/video", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_track_ids_conflict() {
    let (_dir, app) = setup_app().await;
    let owner = Caller::artist();

    let (_, session) = call(&app, owner.request("POST", "/wizard", None)).await;
    let session_id = session["id"].as_str().unwrap().to_string();

    let mut form = complete_form();
    let repeated = form.tracks[0].clone();
    form.tracks.push(repeated);
    let (status, body) = call(
        &app,
        owner.request(
            "PUT",
            &format!("/wizard/{}", session_id),
            Some(serde_json::to_value(form).unwrap()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

// =============================================================================
// Admin event stream
// =============================================================================

#[tokio::test]
async fn test_admin_event_stream_opens_with_connection_event() {
    let (_dir, app) = setup_app().await;
    let admin = Caller::admin();

    let response = app
        .clone()
        .oneshot(admin.request("GET", "/admin/events", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/event-stream"), "got {}", content_type);

    // The stream never ends; read only the first frame
    let mut frames = response.into_body().into_data_stream();
    let first = frames.next().await.unwrap().unwrap();
    let text = String::from_utf8(first.to_vec()).unwrap();
    assert!(text.contains("event: ConnectionStatus"), "got {:?}", text);
    assert!(text.contains("data: connected"), "got {:?}", text);
}

#[tokio::test]
async fn test_admin_event_stream_forbidden_for_artist() {
    let (_dir, app) = setup_app().await;
    let artist = Caller::artist();

    let (status, body) = call(&app, artist.request("GET", "/admin/events", None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "ACTOR_NOT_AUTHORIZED");
}
