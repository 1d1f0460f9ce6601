//! Recompute server settings

use folio_cms::CmsConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Default listen address
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST), 3000);

/// Recompute server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecomputeConfig {
    /// CMS connection
    pub cms: CmsConfig,
    /// Shared secret webhook and manual calls must present
    pub webhook_secret: Option<String>,
    /// Listen address
    pub bind: SocketAddr,
}

impl RecomputeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the environment
    ///
    /// CMS settings as in [`CmsConfig::from_env`], plus `CMS_WEBHOOK_SECRET`
    /// (or `STRAPI_WEBHOOK_SECRET`).
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Fill fields that are still unset from the environment
    #[must_use]
    pub fn merge_env(mut self) -> Self {
        self.cms = self.cms.merge_env();
        if self.webhook_secret.is_none() {
            self.webhook_secret = ["CMS_WEBHOOK_SECRET", "STRAPI_WEBHOOK_SECRET"]
                .iter()
                .filter_map(|name| std::env::var(name).ok())
                .find(|value| !value.trim().is_empty());
        }
        self
    }

    /// With CMS connection
    #[inline]
    #[must_use]
    pub fn with_cms(mut self, cms: CmsConfig) -> Self {
        self.cms = cms;
        self
    }

    /// With webhook secret
    #[inline]
    #[must_use]
    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    /// With listen address
    #[inline]
    #[must_use]
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }
}

impl Default for RecomputeConfig {
    fn default() -> Self {
        Self {
            cms: CmsConfig::default(),
            webhook_secret: None,
            bind: DEFAULT_BIND,
        }
    }
}
