//! Gate settings

use folio_cms::config::duration_ms;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Version gate configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Maximum number of cached content blocks
    pub cache_capacity: u64,
    /// How long a cached block lives before it must be fetched again
    #[serde(with = "duration_ms")]
    pub cache_ttl: Duration,
    /// Minimum spacing between manual refetches; `None` disables the check
    #[serde(with = "duration_ms::option")]
    pub refetch_cooldown: Option<Duration>,
}

impl GateConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// With cache entry lifetime
    #[inline]
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// With refetch cooldown
    #[inline]
    #[must_use]
    pub fn with_refetch_cooldown(mut self, cooldown: Duration) -> Self {
        self.refetch_cooldown = Some(cooldown);
        self
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 64,
            cache_ttl: Duration::from_secs(24 * 60 * 60),
            refetch_cooldown: None,
        }
    }
}
