//! Launch options
//!
//! Read from a page URL (`?debug=1&clearCache=1&bypass=1`) or set from CLI
//! flags. Only the literal value `1` switches an option on.

use url::Url;

/// Per-session switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Verbose diagnostics
    pub debug: bool,
    /// Wipe persisted caches before the first reconciliation
    pub clear_cache: bool,
    /// Ignore the refetch cooldown
    pub bypass_cooldown: bool,
}

impl LaunchOptions {
    /// Parse the query string of `url`
    ///
    /// # Errors
    ///
    /// Returns the parse error when `url` is not an absolute URL.
    pub fn from_url(url: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(url)?;
        Ok(Self::from_pairs(url.query_pairs()))
    }

    /// Parse a bare query string, with or without the leading `?`
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    fn from_pairs<'a>(pairs: impl Iterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>) -> Self {
        let mut options = Self::default();
        for (name, value) in pairs {
            let on = value == "1";
            match name.as_ref() {
                "debug" => options.debug |= on,
                "clearCache" => options.clear_cache |= on,
                "bypass" | "forceVersionCheck" => options.bypass_cooldown |= on,
                _ => {}
            }
        }
        options
    }

    /// With debug diagnostics
    #[inline]
    #[must_use]
    pub fn with_debug(mut self, on: bool) -> Self {
        self.debug = on;
        self
    }

    /// With cache clearing
    #[inline]
    #[must_use]
    pub fn with_clear_cache(mut self, on: bool) -> Self {
        self.clear_cache = on;
        self
    }

    /// With cooldown bypass
    #[inline]
    #[must_use]
    pub fn with_bypass_cooldown(mut self, on: bool) -> Self {
        self.bypass_cooldown = on;
        self
    }
}
