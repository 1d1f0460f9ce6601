//! Settings file
//!
//! ```toml
//! state_dir = ".folio"
//!
//! [cms]
//! base_url = "https://cms.example.com"
//! probe_timeout = 400
//!
//! [gate]
//! refetch_cooldown = 30000
//!
//! [server]
//! bind = "0.0.0.0:3000"
//! ```
//!
//! Durations are milliseconds. Secrets are best left to the environment.

use anyhow::Context as _;
use folio_cms::CmsConfig;
use folio_gate::GateConfig;
use folio_recompute::config::DEFAULT_BIND;
use folio_recompute::RecomputeConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Recompute server section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    /// Shared secret for webhook and manual recompute calls
    pub webhook_secret: Option<String>,
    /// Listen address
    pub bind: Option<SocketAddr>,
}

/// Everything the CLI can be configured with
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory for persisted manifest and content snapshot
    pub state_dir: Option<PathBuf>,
    /// CMS connection
    pub cms: CmsConfig,
    /// Version gate tuning
    pub gate: GateConfig,
    /// Recompute server
    pub server: ServerSettings,
}

impl Settings {
    /// Parse settings from TOML text, without touching the environment
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML or unknown value types.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("Invalid settings file")
    }

    /// Load `path` if given, then fill unset CMS fields from the environment
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Cannot read settings file {}", path.display()))?;
                let settings = Self::from_toml(&text)?;
                tracing::debug!("Loaded settings from {}", path.display());
                settings
            }
            None => Self::default(),
        };
        settings.cms = settings.cms.merge_env();
        Ok(settings)
    }

    /// Recompute server configuration
    #[must_use]
    pub fn recompute(&self) -> RecomputeConfig {
        let mut config = RecomputeConfig::new()
            .with_cms(self.cms.clone())
            .with_bind(self.server.bind.unwrap_or(DEFAULT_BIND));
        if let Some(secret) = &self.server.webhook_secret {
            config = config.with_webhook_secret(secret.clone());
        }
        config.merge_env()
    }
}
