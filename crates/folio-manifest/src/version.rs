//! Global version derivation
//!
//! `globalVersion = sha256_hex(tokens joined by '|') + "-" + timestamp`.
//! Unknown tokens join as empty strings. The timestamp suffix makes every
//! recompute produce a fresh global token even when no section moved; clients
//! never diff on it.

use crate::manifest::SectionVersions;
use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

/// Digest of the section tokens, order-sensitive
#[must_use]
pub fn section_digest(sections: &SectionVersions) -> String {
    let joined = sections
        .iter()
        .map(|(_, token)| token.unwrap_or(""))
        .collect::<Vec<_>>()
        .join("|");

    hex::encode(Sha256::digest(joined.as_bytes()))
}

/// Global token for `sections` stamped at `at`
#[must_use]
pub fn derive_global_version(sections: &SectionVersions, at: DateTime<Utc>) -> String {
    format!(
        "{}-{}",
        section_digest(sections),
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}
