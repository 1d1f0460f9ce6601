//! Recompute router against a fake CMS served on a local port

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use folio_cms::CmsConfig;
use folio_recompute::{router, AppState, RecomputeConfig};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const SECRET: &str = "hook-secret";

#[derive(Default)]
struct FakeCmsState {
    /// content type → updatedAt; a missing entry answers 500
    updated: HashMap<String, Option<String>>,
    /// stored manifest fields; `None` answers 503
    stored: Option<Value>,
    fail_put: bool,
    puts: Vec<Value>,
    auth: Vec<Option<String>>,
}

#[derive(Clone, Default)]
struct FakeCms(Arc<Mutex<FakeCmsState>>);

impl FakeCms {
    fn healthy() -> Self {
        let cms = Self::default();
        {
            let mut state = cms.0.lock().unwrap();
            for (i, ct) in ["home", "about", "contact", "skill", "experience", "testimonial"]
                .into_iter()
                .enumerate()
            {
                state
                    .updated
                    .insert(ct.to_string(), Some(format!("2024-05-0{}T10:00:00.000Z", i + 1)));
            }
            state.stored = Some(json!({
                "globalVersion": "old",
                "homeVersion": "stored-home",
                "aboutVersion": "stored-about",
                "contactVersion": "stored-contact",
                "skillsVersion": "stored-skills",
                "experienceVersion": "stored-experience",
                "testimonialsVersion": "stored-testimonials"
            }));
        }
        cms
    }

    fn with<R>(&self, f: impl FnOnce(&mut FakeCmsState) -> R) -> R {
        f(&mut self.0.lock().unwrap())
    }

    fn puts(&self) -> Vec<Value> {
        self.with(|s| s.puts.clone())
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn entry(State(cms): State<FakeCms>, Path(ct): Path<String>, headers: HeaderMap) -> Response {
    cms.with(|s| {
        s.auth.push(bearer(&headers));
        match s.updated.get(&ct) {
            Some(Some(at)) => Json(json!({ "data": { "id": 1, "updatedAt": at } })).into_response(),
            Some(None) => Json(json!({ "data": { "id": 1 } })).into_response(),
            None => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        }
    })
}

async fn read_manifest(State(cms): State<FakeCms>, headers: HeaderMap) -> Response {
    cms.with(|s| {
        s.auth.push(bearer(&headers));
        match &s.stored {
            Some(fields) => Json(json!({ "data": { "id": 1, "attributes": fields } })).into_response(),
            None => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "error": "down" }))).into_response(),
        }
    })
}

async fn write_manifest(State(cms): State<FakeCms>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    cms.with(|s| {
        s.auth.push(bearer(&headers));
        if s.fail_put {
            return (StatusCode::FORBIDDEN, "no").into_response();
        }
        s.puts.push(body.clone());
        Json(json!({ "data": body["data"] })).into_response()
    })
}

async fn spawn_cms(cms: FakeCms) -> String {
    let app = Router::new()
        .route("/api/manifest", get(read_manifest).put(write_manifest))
        .route("/api/{ct}", get(entry))
        .with_state(cms);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn config(base: &str) -> RecomputeConfig {
    RecomputeConfig::default()
        .with_cms(
            CmsConfig::new()
                .with_base_url(base)
                .with_api_token("read-token")
                .with_manifest_token("manifest-token"),
        )
        .with_webhook_secret(SECRET)
}

fn app(config: RecomputeConfig) -> Router {
    router(AppState::new(config).unwrap())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

fn manual_get(secret: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/api/strapi-version?secret={secret}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn manual_recompute_writes_every_section() {
    let cms = FakeCms::healthy();
    let base = spawn_cms(cms.clone()).await;

    let (status, _, body) = send(app(config(&base)), manual_get(SECRET)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["updated"]["homeVersion"], json!("2024-05-01T10:00:00.000Z"));
    assert_eq!(body["updated"]["skillsVersion"], json!("2024-05-04T10:00:00.000Z"));
    assert_eq!(body["updated"]["testimonialsVersion"], json!("2024-05-06T10:00:00.000Z"));

    let global = body["globalVersion"].as_str().unwrap();
    assert_eq!(body["updated"]["globalVersion"], json!(global));
    assert!(global.ends_with('Z'));

    let puts = cms.puts();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0]["data"], body["updated"]);

    // every CMS call carried the manifest token
    let auth = cms.with(|s| s.auth.clone());
    assert_eq!(auth.len(), 7);
    assert!(auth.iter().all(|a| a.as_deref() == Some("Bearer manifest-token")));
}

#[tokio::test]
async fn webhook_post_with_header_secret_recomputes() {
    let cms = FakeCms::healthy();
    let base = spawn_cms(cms.clone()).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/strapi-version")
        .header("x-secret", SECRET)
        .header("content-type", "application/json")
        .body(Body::from(r#"{"event":"entry.publish","model":"api::about.about"}"#))
        .unwrap();
    let (status, _, body) = send(app(config(&base)), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(cms.puts().len(), 1);
}

#[tokio::test]
async fn wrong_secret_is_rejected_without_touching_the_cms() {
    let cms = FakeCms::healthy();
    let base = spawn_cms(cms.clone()).await;

    let (status, _, body) = send(app(config(&base)), manual_get("guess")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "ok": false, "error": "Unauthorized" }));
    assert!(cms.with(|s| s.auth.is_empty()));
}

#[tokio::test]
async fn missing_secret_configuration_is_a_server_error() {
    let cms = FakeCms::healthy();
    let base = spawn_cms(cms.clone()).await;
    let mut config = config(&base);
    config.webhook_secret = None;

    let (status, _, body) = send(app(config), manual_get(SECRET)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], json!(false));
    assert!(cms.puts().is_empty());
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/strapi-version")
        .header("x-secret", SECRET)
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app(config("http://127.0.0.1:9")), request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "ok": false, "error": "Method not allowed" }));
}

#[tokio::test]
async fn unresolved_section_keeps_its_stored_token() {
    let cms = FakeCms::healthy();
    cms.with(|s| {
        s.updated.remove("skill");
        s.updated.insert("contact".to_string(), None);
    });
    let base = spawn_cms(cms.clone()).await;

    let (status, _, body) = send(app(config(&base)), manual_get(SECRET)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"]["skillsVersion"], json!("stored-skills"));
    assert_eq!(body["updated"]["contactVersion"], json!("stored-contact"));
    assert_eq!(body["updated"]["homeVersion"], json!("2024-05-01T10:00:00.000Z"));
}

#[tokio::test]
async fn unresolved_section_without_stored_manifest_writes_nothing() {
    let cms = FakeCms::healthy();
    cms.with(|s| {
        s.updated.remove("experience");
        s.stored = None;
    });
    let base = spawn_cms(cms.clone()).await;

    let (status, _, body) = send(app(config(&base)), manual_get(SECRET)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], json!(false));
    assert!(cms.puts().is_empty());
}

#[tokio::test]
async fn rejected_write_is_a_server_error() {
    let cms = FakeCms::healthy();
    cms.with(|s| s.fail_put = true);
    let base = spawn_cms(cms.clone()).await;

    let (status, _, body) = send(app(config(&base)), manual_get(SECRET)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], json!(false));
}

#[tokio::test]
async fn missing_manifest_token_is_a_config_error() {
    let cms = FakeCms::healthy();
    let base = spawn_cms(cms.clone()).await;
    let config = RecomputeConfig::default()
        .with_cms(CmsConfig::new().with_base_url(&base))
        .with_webhook_secret(SECRET);

    let (status, _, body) = send(app(config), manual_get(SECRET)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("Missing manifest token"));
    assert!(cms.with(|s| s.auth.is_empty()));
}

#[tokio::test]
async fn proxy_relays_manifest_with_cache_headers() {
    let cms = FakeCms::healthy();
    let base = spawn_cms(cms.clone()).await;

    let request = Request::builder().uri("/api/manifest").body(Body::empty()).unwrap();
    let (status, headers, body) = send(app(config(&base)), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(headers["cache-control"], "s-maxage=60, stale-while-revalidate=300");
    assert_eq!(body["data"]["attributes"]["homeVersion"], json!("stored-home"));
    assert_eq!(
        cms.with(|s| s.auth.clone()),
        vec![Some("Bearer manifest-token".to_string())]
    );
}

#[tokio::test]
async fn proxy_passes_upstream_errors_through() {
    let cms = FakeCms::healthy();
    cms.with(|s| s.stored = None);
    let base = spawn_cms(cms).await;

    let request = Request::builder().uri("/api/manifest").body(Body::empty()).unwrap();
    let (status, _, body) = send(app(config(&base)), request).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "error": "down" }));
}

#[tokio::test]
async fn proxy_transport_failure_is_a_500() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let request = Request::builder().uri("/api/manifest").body(Body::empty()).unwrap();
    let (status, _, body) = send(app(config(&format!("http://{addr}"))), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "ok": false, "error": "proxy failed" }));
}
