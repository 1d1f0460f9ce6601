//! Client-side persistence for folio
//!
//! A synchronous key-value store that survives restarts, and a
//! [`PersistentSlot`] on top of it that never lets a storage failure escape:
//! unreadable entries are cleared, failing writes flip the slot into an
//! in-memory mode for the rest of the session.
//!
//! # Example
//!
//! ```rust
//! use folio_manifest::VersionManifest;
//! use folio_store::{ManifestStore, MemoryStore};
//!
//! let store = ManifestStore::manifest(MemoryStore::new());
//! assert_eq!(store.load(), None);
//!
//! let manifest = VersionManifest::uniform("g1", "1");
//! store.save(&manifest);
//! assert_eq!(store.load(), Some(manifest));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod file;
pub mod kv;
pub mod slot;

pub use error::StoreError;
pub use file::FileStore;
pub use kv::{KeyValueStore, MemoryStore, SharedStore};
pub use slot::{ManifestStore, Persistence, PersistentSlot};

/// Key holding the last reconciled manifest
pub const MANIFEST_KEY: &str = "portfolioVersions";

/// Key holding the persisted content cache snapshot
pub const CONTENT_SNAPSHOT_KEY: &str = "portfolio-query-cache-v1";

/// Key of the retired manifest cache, still swept on a cache clear
pub const LEGACY_MANIFEST_CACHE_KEY: &str = "manifestCache";

/// Every key a cache clear removes
pub const ALL_CACHE_KEYS: [&str; 3] = [CONTENT_SNAPSHOT_KEY, LEGACY_MANIFEST_CACHE_KEY, MANIFEST_KEY];
