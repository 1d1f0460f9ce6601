//! HTTP surface of the recompute server

use crate::config::RecomputeConfig;
use crate::error::RecomputeError;
use crate::recompute::{recompute, WebhookEvent};
use axum::body::{Body, Bytes};
use axum::extract::{Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use folio_cms::CmsClient;
use serde::Deserialize;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Recompute trigger path
pub const RECOMPUTE_PATH: &str = "/api/strapi-version";

/// Manifest read-proxy path
pub const PROXY_PATH: &str = "/api/manifest";

/// Header carrying the shared secret
pub const SECRET_HEADER: &str = "x-secret";

/// Cache policy of proxied manifest responses
pub const PROXY_CACHE_CONTROL: &str = "s-maxage=60, stale-while-revalidate=300";

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    client: CmsClient,
    config: Arc<RecomputeConfig>,
}

impl AppState {
    /// Build state from configuration
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(config: RecomputeConfig) -> Result<Self, RecomputeError> {
        let client = CmsClient::new(config.cms.clone())?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// CMS client in use
    #[inline]
    #[must_use]
    pub fn client(&self) -> &CmsClient {
        &self.client
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RecomputeConfig {
        &self.config
    }
}

#[derive(Debug, Default, Deserialize)]
struct SecretQuery {
    secret: Option<String>,
}

/// Router serving recompute and the manifest proxy
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(RECOMPUTE_PATH, get(recompute_handler).post(recompute_handler))
        .route(PROXY_PATH, get(proxy_manifest))
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `config.bind` and serve until `shutdown` resolves
///
/// # Errors
///
/// Client construction, bind or serve failures.
pub async fn serve<F>(config: RecomputeConfig, shutdown: F) -> Result<(), RecomputeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind = config.bind;
    let state = AppState::new(config)?;
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("Recompute server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn method_not_allowed() -> RecomputeError {
    RecomputeError::MethodNotAllowed
}

async fn recompute_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    Query(query): Query<SecretQuery>,
    body: Bytes,
) -> Result<Json<Value>, RecomputeError> {
    authorize(state.config(), &headers, query.secret.as_deref())?;

    if method == Method::POST {
        let event = WebhookEvent::parse(&body);
        match (event.model(), event.section()) {
            (Some(model), Some(section)) => {
                tracing::info!("Webhook for {} ({}), recomputing all sections", model, section);
            }
            (Some(model), None) => tracing::info!("Webhook for untracked model {}, recomputing anyway", model),
            (None, _) => tracing::info!("Webhook without model, recomputing all sections"),
        }
    } else {
        tracing::info!("Manual recompute requested");
    }

    let outcome = recompute(state.client(), Utc::now()).await?;
    Ok(Json(json!({
        "ok": true,
        "updated": outcome.updated,
        "globalVersion": outcome.global_version,
    })))
}

fn authorize(config: &RecomputeConfig, headers: &HeaderMap, query_secret: Option<&str>) -> Result<(), RecomputeError> {
    let expected = config
        .webhook_secret
        .as_deref()
        .filter(|secret| !secret.is_empty())
        .ok_or_else(|| RecomputeError::Config("Missing webhook secret".to_string()))?;

    let presented = headers
        .get(SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .or(query_secret);

    match presented {
        Some(secret) if secret == expected => Ok(()),
        _ => Err(RecomputeError::Unauthorized),
    }
}

async fn proxy_manifest(State(state): State<AppState>) -> Response {
    match state.client().relay_manifest().await {
        Ok(relayed) => {
            let status = StatusCode::from_u16(relayed.status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                [(CONTENT_TYPE, "application/json"), (CACHE_CONTROL, PROXY_CACHE_CONTROL)],
                Body::from(relayed.body),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Manifest proxy failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": "proxy failed" })),
            )
                .into_response()
        }
    }
}
