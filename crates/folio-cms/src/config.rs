//! CMS connection settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default reachability probe timeout
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(400);

/// Default health path probed on the CMS origin
pub const DEFAULT_HEALTH_PATH: &str = "/_health";

/// CMS connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    /// Origin of the CMS, without trailing slash
    pub base_url: Option<String>,
    /// Bearer token for content reads
    pub api_token: Option<String>,
    /// Bearer token allowed to read and write the manifest entry
    pub manifest_token: Option<String>,
    /// Overall request deadline; `None` keeps the transport default
    #[serde(with = "duration_ms::option")]
    pub request_timeout: Option<Duration>,
    /// Per-attempt deadline for reachability probes
    #[serde(with = "duration_ms")]
    pub probe_timeout: Duration,
    /// Path probed for reachability
    pub health_path: String,
}

impl CmsConfig {
    /// Create default configuration (no base URL)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the environment
    ///
    /// `CMS_URL` (or `VITE_STRAPI_URL`), `CMS_TOKEN` (or `VITE_STRAPI_TOKEN`),
    /// `CMS_MANIFEST_TOKEN` (or `STRAPI_MANIFEST_TOKEN`). Empty values count
    /// as unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Fill fields that are still unset from the environment
    #[must_use]
    pub fn merge_env(mut self) -> Self {
        if self.base_url.is_none() {
            self.base_url = env_any(&["CMS_URL", "VITE_STRAPI_URL"]).map(|url| trim_base(&url));
        }
        if self.api_token.is_none() {
            self.api_token = env_any(&["CMS_TOKEN", "VITE_STRAPI_TOKEN"]);
        }
        if self.manifest_token.is_none() {
            self.manifest_token = env_any(&["CMS_MANIFEST_TOKEN", "STRAPI_MANIFEST_TOKEN"]);
        }
        self
    }

    /// With base URL (trailing slash trimmed)
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, url: impl AsRef<str>) -> Self {
        self.base_url = Some(trim_base(url.as_ref()));
        self
    }

    /// With content read token
    #[inline]
    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// With manifest token
    #[inline]
    #[must_use]
    pub fn with_manifest_token(mut self, token: impl Into<String>) -> Self {
        self.manifest_token = Some(token.into());
        self
    }

    /// With request deadline
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// With probe deadline
    #[inline]
    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// With health path
    #[inline]
    #[must_use]
    pub fn with_health_path(mut self, path: impl Into<String>) -> Self {
        self.health_path = path.into();
        self
    }

    /// Base URL with any trailing slash removed, if configured
    #[must_use]
    pub fn base(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_token: None,
            manifest_token: None,
            request_timeout: None,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            health_path: DEFAULT_HEALTH_PATH.to_string(),
        }
    }
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn env_any(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Serde helpers for durations stored as whole milliseconds
pub mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    /// Serialize as milliseconds
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    /// Deserialize from milliseconds
    ///
    /// # Errors
    ///
    /// Fails unless the value is a non-negative integer.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }

    /// Same, for optional durations
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use std::time::Duration;

        /// Serialize as milliseconds or null
        ///
        /// # Errors
        ///
        /// Propagates serializer errors.
        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(d) => s.serialize_some(&u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
                None => s.serialize_none(),
            }
        }

        /// Deserialize from milliseconds or null
        ///
        /// # Errors
        ///
        /// Fails unless the value is null or a non-negative integer.
        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
            Option::<u64>::deserialize(d).map(|ms| ms.map(Duration::from_millis))
        }
    }
}
