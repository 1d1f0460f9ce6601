//! Version gate for folio
//!
//! On session start the gate decides whether cached content is still fresh:
//!
//! 1. load the last reconciled manifest from the store
//! 2. fetch the live manifest
//! 3. diff the section tokens
//! 4. fetch every changed section in parallel
//! 5. seed the [`ContentCache`] and persist a content snapshot
//! 6. persist the live manifest and settle as `ready(ok)`
//!
//! Any failure in steps 2-5 settles the gate as `ready(error)` without
//! touching the cache or the store. [`VersionGate::refetch`] re-runs the
//! cycle; only one reconciliation runs at a time.
//!
//! The [`ReachabilityGuard`] answers a separate question (is the CMS up at
//! all) and is reported separately.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod config;
pub mod error;
pub mod gate;
pub mod options;
pub mod phase;
pub mod reachability;

pub use cache::ContentCache;
pub use config::GateConfig;
pub use error::GateError;
pub use gate::{GateState, VersionGate};
pub use options::LaunchOptions;
pub use phase::GatePhase;
pub use reachability::{Probe, ReachabilityGuard};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
