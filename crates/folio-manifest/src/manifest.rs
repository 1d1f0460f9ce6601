//! The version manifest record
//!
//! Persisted form (camelCase, one entry per section, `null` for unknown):
//!
//! ```json
//! { "globalVersion": "…", "sections": { "home": "…", "about": null, … } }
//! ```

use crate::error::ManifestError;
use crate::section::SectionKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed-shape map from every [`SectionKey`] to its version token
///
/// Always holds exactly one slot per section; `None` means the token is
/// unknown or not computed yet. Sections missing from a decoded map are
/// filled with `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<SectionKey, Option<String>>",
    into = "BTreeMap<SectionKey, Option<String>>"
)]
pub struct SectionVersions([Option<String>; SectionKey::COUNT]);

impl SectionVersions {
    /// All sections unknown
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for one section
    #[inline]
    #[must_use]
    pub fn get(&self, key: SectionKey) -> Option<&str> {
        self.0[key.index()].as_deref()
    }

    /// Replace the token for one section
    #[inline]
    pub fn set(&mut self, key: SectionKey, token: Option<String>) {
        self.0[key.index()] = token;
    }

    /// Iterate in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (SectionKey, Option<&str>)> + '_ {
        SectionKey::ALL
            .into_iter()
            .map(move |key| (key, self.get(key)))
    }

    /// Number of sections with a known token
    #[must_use]
    pub fn known_count(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_some()).count()
    }
}

impl From<BTreeMap<SectionKey, Option<String>>> for SectionVersions {
    fn from(map: BTreeMap<SectionKey, Option<String>>) -> Self {
        let mut versions = Self::new();
        for (key, token) in map {
            versions.set(key, token);
        }
        versions
    }
}

impl From<SectionVersions> for BTreeMap<SectionKey, Option<String>> {
    fn from(versions: SectionVersions) -> Self {
        SectionKey::ALL
            .into_iter()
            .zip(versions.0)
            .collect()
    }
}

/// Authoritative snapshot of content freshness
///
/// `global_version` is opaque and never used for diffing; only the
/// per-section tokens are compared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VersionManifest {
    /// Summary token over all sections
    pub global_version: String,
    /// Per-section tokens
    pub sections: SectionVersions,
}

impl VersionManifest {
    /// Create manifest from parts
    #[inline]
    #[must_use]
    pub fn new(global_version: impl Into<String>, sections: SectionVersions) -> Self {
        Self {
            global_version: global_version.into(),
            sections,
        }
    }

    /// Manifest where every section carries the same token
    #[must_use]
    pub fn uniform(global_version: impl Into<String>, token: &str) -> Self {
        let mut sections = SectionVersions::new();
        for key in SectionKey::ALL {
            sections.set(key, Some(token.to_string()));
        }
        Self::new(global_version, sections)
    }

    /// With one section token replaced
    #[inline]
    #[must_use]
    pub fn with_section(mut self, key: SectionKey, token: impl Into<String>) -> Self {
        self.sections.set(key, Some(token.into()));
        self
    }

    /// With one section token cleared
    #[inline]
    #[must_use]
    pub fn without_section(mut self, key: SectionKey) -> Self {
        self.sections.set(key, None);
        self
    }

    /// Token for one section
    #[inline]
    #[must_use]
    pub fn section(&self, key: SectionKey) -> Option<&str> {
        self.sections.get(key)
    }

    /// Decode a persisted manifest
    ///
    /// A JSON `null` decodes to `Ok(None)`, matching an absent entry.
    ///
    /// # Errors
    /// Returns [`ManifestError::Json`] when the text is not a manifest.
    pub fn from_json(text: &str) -> Result<Option<Self>, ManifestError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode for persistence
    ///
    /// # Errors
    /// Returns [`ManifestError::Json`] if encoding fails.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string(self)?)
    }
}
