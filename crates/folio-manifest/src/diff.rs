//! Manifest comparison
//!
//! Pure and deterministic. Tokens are compared by plain equality; there is
//! no ordering between versions, only "same" or "different".

use crate::manifest::VersionManifest;
use crate::section::SectionKey;

/// Sections whose token differs between `previous` and `current`
///
/// Without a previous manifest every section counts as changed, which turns
/// a first visit into a full refetch. Keys come back in enumeration order.
#[must_use]
pub fn diff_sections(previous: Option<&VersionManifest>, current: &VersionManifest) -> Vec<SectionKey> {
    let Some(previous) = previous else {
        return SectionKey::ALL.to_vec();
    };

    current
        .sections
        .iter()
        .filter(|(key, token)| previous.section(*key) != *token)
        .map(|(key, _)| key)
        .collect()
}
