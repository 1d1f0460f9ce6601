//! Server side of the folio manifest
//!
//! Two endpoints, served as one axum [`Router`](axum::Router):
//!
//! - `GET|POST /api/strapi-version`: recompute every section token from the
//!   CMS entries' `updatedAt`, derive a fresh global version and write the
//!   manifest back. Webhook calls and manual calls both need the shared
//!   secret.
//! - `GET /api/manifest`: relay the stored manifest with a short shared
//!   cache lifetime.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod recompute;
pub mod router;

pub use config::RecomputeConfig;
pub use error::RecomputeError;
pub use recompute::{recompute, Recomputed, WebhookEvent};
pub use router::{router, serve, AppState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
