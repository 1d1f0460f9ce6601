//! Version manifest model for folio
//!
//! A manifest carries one opaque version token per tracked content section
//! plus a derived global token. This crate owns:
//!
//! - [`SectionKey`]: the closed set of tracked sections
//! - [`VersionManifest`]: the manifest record and its fixed-shape section map
//! - [`diff_sections`]: the pure comparison used to decide what to refetch
//! - [`wire`]: normalization of the two CMS response shapes
//! - [`version`]: derivation of the global token on the server side
//!
//! # Example
//!
//! ```rust
//! use folio_manifest::{diff_sections, SectionKey, VersionManifest};
//!
//! let saved = VersionManifest::uniform("g1", "1");
//! let live = saved.clone().with_section(SectionKey::Home, "2");
//!
//! assert_eq!(diff_sections(Some(&saved), &live), vec![SectionKey::Home]);
//! assert_eq!(diff_sections(None, &live).len(), SectionKey::COUNT);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod diff;
pub mod error;
pub mod manifest;
pub mod section;
pub mod version;
pub mod wire;

pub use diff::diff_sections;
pub use error::ManifestError;
pub use manifest::{SectionVersions, VersionManifest};
pub use section::SectionKey;
pub use wire::{EntryShape, ManifestFields};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
