//! Headless CMS client for folio
//!
//! Everything that talks HTTP to the CMS lives here:
//!
//! - [`CmsClient::fetch_manifest`]: the live version manifest, normalized
//!   from either wire shape, never cached
//! - [`CmsClient::fetch_content`]: one content block, mapped onto its typed
//!   [`Content`] variant
//! - [`CmsClient::fetch_updated_at`] / [`CmsClient::put_manifest`]: the
//!   server-side recompute primitives
//! - [`CmsClient::probe`]: a cheap reachability check against the origin
//!
//! The [`ManifestSource`] and [`ContentSource`] traits are the seams the
//! version gate is written against, so it can run on fakes.
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_cms::{CmsClient, CmsConfig, ManifestSource};
//!
//! # async fn example() -> Result<(), folio_cms::CmsError> {
//! let client = CmsClient::new(CmsConfig::from_env())?;
//! let live = client.fetch_manifest().await?;
//! println!("global version {}", live.global_version);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod source;

pub use client::{CmsClient, RelayedResponse};
pub use config::CmsConfig;
pub use content::{media_url, Content, ContentKey};
pub use error::CmsError;
pub use source::{ContentSource, ManifestSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
