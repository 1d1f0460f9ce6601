//! Error types for the recompute server
//!
//! Every error answers `{ "ok": false, "error": "<message>" }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use folio_cms::CmsError;
use serde_json::json;

/// Errors answering a recompute or proxy request
#[derive(Debug, thiserror::Error)]
pub enum RecomputeError {
    /// Server is missing a setting (base URL, token, secret)
    #[error("{0}")]
    Config(String),

    /// Secret missing or wrong
    #[error("Unauthorized")]
    Unauthorized,

    /// Neither GET nor POST
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// CMS call failed
    #[error(transparent)]
    Upstream(#[from] CmsError),

    /// Listener could not be bound or served
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecomputeError {
    /// HTTP status this error answers with
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Config(_) | Self::Upstream(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RecomputeError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Recompute request failed: {}", self);
        }
        (status, Json(json!({ "ok": false, "error": self.to_string() }))).into_response()
    }
}
