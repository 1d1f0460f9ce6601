//! Error types for CMS access
//!
//! - configuration problems are caught before any request is sent
//! - transport failures and non-2xx statuses are reported separately, but
//!   callers on the client side treat them the same way

/// Boxed transport cause, so fakes can report failures without a live client
pub type TransportCause = Box<dyn std::error::Error + Send + Sync>;

/// Errors talking to the CMS
#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    /// Required setting (base URL, token, secret) is missing or invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// Request never produced a response
    #[error("request to {path} failed: {source}")]
    Transport {
        /// Request path
        path: String,
        /// Underlying cause
        #[source]
        source: TransportCause,
    },

    /// Response status was not 2xx
    #[error("CMS returned {status} for {path}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Request path
        path: String,
        /// Response body, possibly empty
        body: String,
    },

    /// Response body did not have the expected shape
    #[error("unexpected response for {path}: {message}")]
    Decode {
        /// Request path
        path: String,
        /// What was wrong
        message: String,
    },
}

impl CmsError {
    /// Create transport error for path
    pub fn transport(path: impl Into<String>, source: impl Into<TransportCause>) -> Self {
        Self::Transport {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Create status error without body
    pub fn status(status: u16, path: impl Into<String>) -> Self {
        Self::Status {
            status,
            path: path.into(),
            body: String::new(),
        }
    }

    /// Create decode error for path
    pub fn decode(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Whether this is a configuration problem
    #[inline]
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Whether a later retry could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Config(_) | Self::Decode { .. } => false,
        }
    }
}
