//! CmsClient against a local axum server

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, head};
use axum::{Json, Router};
use folio_cms::{CmsClient, CmsConfig, CmsError, Content, ContentKey};
use folio_manifest::{ManifestFields, SectionKey, VersionManifest};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
struct Hit {
    path: String,
    query: HashMap<String, String>,
    auth: Option<String>,
    cache_control: Option<String>,
}

#[derive(Clone, Default)]
struct Seen {
    hits: Arc<Mutex<Vec<Hit>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

impl Seen {
    fn record(&self, path: &str, query: HashMap<String, String>, headers: &HeaderMap) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.hits.lock().unwrap().push(Hit {
            path: path.to_string(),
            query,
            auth: header("authorization"),
            cache_control: header("cache-control"),
        });
    }

    fn last(&self) -> Hit {
        self.hits.lock().unwrap().last().cloned().unwrap()
    }
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn cms_app(seen: Seen) -> Router {
    Router::new()
        .route(
            "/api/manifest",
            get(
                |State(seen): State<Seen>, Query(q): Query<HashMap<String, String>>, headers: HeaderMap| async move {
                    seen.record("/api/manifest", q, &headers);
                    Json(json!({
                        "data": {
                            "id": 1,
                            "attributes": {
                                "globalVersion": "g-1",
                                "homeVersion": "2024-01-01T00:00:00.000Z",
                                "aboutVersion": null,
                                "contactVersion": "c",
                                "skillsVersion": "s",
                                "experienceVersion": "e",
                                "testimonialsVersion": "t"
                            }
                        }
                    }))
                },
            )
            .put(|State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>| async move {
                seen.record("/api/manifest", HashMap::new(), &headers);
                seen.bodies.lock().unwrap().push(body.clone());
                Json(json!({ "data": body["data"] }))
            }),
        )
        .route(
            "/api/home",
            get(|State(seen): State<Seen>, Query(q): Query<HashMap<String, String>>, headers: HeaderMap| async move {
                seen.record("/api/home", q, &headers);
                Json(json!({ "data": { "greeting": "Hi", "highlightedName": "Ada", "resume": null } }))
            }),
        )
        .route(
            "/api/contact",
            get(|State(seen): State<Seen>, Query(q): Query<HashMap<String, String>>, headers: HeaderMap| async move {
                seen.record("/api/contact", q, &headers);
                Json(json!({ "data": { "updatedAt": "2024-04-04T04:04:04.000Z", "heading": "h", "description": "d" } }))
            }),
        )
        .route("/api/about", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
        .route("/api/skill", get(|| async { "not json" }))
        .with_state(seen)
}

fn client(base: &str) -> CmsClient {
    CmsClient::new(
        CmsConfig::new()
            .with_base_url(format!("{base}/"))
            .with_api_token("read-token")
            .with_manifest_token("write-token"),
    )
    .unwrap()
}

#[tokio::test]
async fn fetch_manifest_requests_named_fields_and_normalizes() {
    let seen = Seen::default();
    let base = spawn(cms_app(seen.clone())).await;

    let manifest = client(&base).fetch_manifest().await.unwrap();

    assert_eq!(manifest.global_version, "g-1");
    assert_eq!(manifest.section(SectionKey::About), None);
    assert_eq!(manifest.section(SectionKey::Contact), Some("c"));

    let hit = seen.last();
    assert_eq!(hit.cache_control.as_deref(), Some("no-store"));
    assert_eq!(
        hit.query.get("fields").map(String::as_str),
        Some("globalVersion,homeVersion,aboutVersion,contactVersion,skillsVersion,experienceVersion,testimonialsVersion")
    );
    assert_eq!(hit.auth.as_deref(), Some("Bearer read-token"));
}

#[tokio::test]
async fn fetch_content_decodes_typed_block() {
    let seen = Seen::default();
    let base = spawn(cms_app(seen.clone())).await;

    let content = client(&base).fetch_content(ContentKey::Home).await.unwrap();
    let Content::Home(home) = content else {
        panic!("expected home content");
    };
    assert_eq!(home.highlighted_name, "Ada");

    let hit = seen.last();
    assert_eq!(hit.path, "/api/home");
    assert_eq!(hit.query.get("populate").map(String::as_str), Some("resume"));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let base = spawn(cms_app(Seen::default())).await;

    let err = client(&base).fetch_content(ContentKey::About).await.unwrap_err();
    assert!(matches!(err, CmsError::Status { status: 503, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let base = spawn(cms_app(Seen::default())).await;

    let err = client(&base).fetch_content(ContentKey::Skills).await.unwrap_err();
    assert!(matches!(err, CmsError::Decode { .. }));
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    // bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}")).fetch_manifest().await.unwrap_err();
    assert!(matches!(err, CmsError::Transport { .. }));
}

#[tokio::test]
async fn updated_at_uses_manifest_token() {
    let seen = Seen::default();
    let base = spawn(cms_app(seen.clone())).await;

    let updated = client(&base).fetch_updated_at(SectionKey::Contact).await.unwrap();
    assert_eq!(updated.as_deref(), Some("2024-04-04T04:04:04.000Z"));

    let hit = seen.last();
    assert_eq!(hit.query.get("fields").map(String::as_str), Some("updatedAt"));
    assert_eq!(hit.auth.as_deref(), Some("Bearer write-token"));
}

#[tokio::test]
async fn put_manifest_sends_data_envelope() {
    let seen = Seen::default();
    let base = spawn(cms_app(seen.clone())).await;

    let manifest = VersionManifest::uniform("g-2", "x").without_section(SectionKey::Home);
    client(&base)
        .put_manifest(ManifestFields::from(&manifest))
        .await
        .unwrap();

    let body = seen.bodies.lock().unwrap().last().cloned().unwrap();
    assert_eq!(body["data"]["globalVersion"], "g-2");
    assert!(body["data"]["homeVersion"].is_null());
    assert_eq!(body["data"]["testimonialsVersion"], "x");
    assert_eq!(seen.last().auth.as_deref(), Some("Bearer write-token"));
}

#[tokio::test]
async fn probe_accepts_client_errors_but_not_server_errors() {
    let up = Router::new().route("/_health", head(|| async { StatusCode::NOT_FOUND }));
    let down = Router::new().route("/_health", get(|| async { StatusCode::BAD_GATEWAY }));

    let up = spawn(up).await;
    let down = spawn(down).await;

    assert!(client(&up).probe().await);
    assert!(!client(&down).probe().await);
}

#[tokio::test]
async fn probe_times_out_on_a_stalled_origin() {
    let slow = Router::new().route(
        "/_health",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::OK
        }),
    );
    let base = spawn(slow).await;

    let client = CmsClient::new(
        CmsConfig::new()
            .with_base_url(&base)
            .with_probe_timeout(Duration::from_millis(100)),
    )
    .unwrap();

    let started = std::time::Instant::now();
    assert!(!client.probe().await);
    assert!(started.elapsed() < Duration::from_secs(2));
}
