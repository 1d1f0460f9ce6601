//! Subcommand implementations

pub mod probe;
pub mod recompute;
pub mod serve;
pub mod show;
pub mod sync;

use crate::Settings;
use anyhow::Context as _;
use folio_cms::CmsClient;
use folio_gate::{LaunchOptions, VersionGate};
use folio_store::{FileStore, MemoryStore, SharedStore};
use std::path::Path;
use std::sync::Arc;

/// CMS client for the configured origin
///
/// # Errors
///
/// Fails if the HTTP client cannot be built.
pub fn client(settings: &Settings) -> anyhow::Result<Arc<CmsClient>> {
    let client = CmsClient::new(settings.cms.clone()).context("Cannot create CMS client")?;
    Ok(Arc::new(client))
}

/// Store under `dir`, or a throwaway in-memory store
///
/// # Errors
///
/// Fails if `dir` cannot be created.
pub fn open_store(dir: Option<&Path>) -> anyhow::Result<SharedStore> {
    match dir {
        Some(dir) => {
            let store = FileStore::open(dir).with_context(|| format!("Cannot open state directory {}", dir.display()))?;
            tracing::debug!("Persisting state under {}", dir.display());
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(MemoryStore::new())),
    }
}

/// Version gate reading from `client` and persisting into `store`
#[must_use]
pub fn gate(client: &Arc<CmsClient>, store: SharedStore, settings: &Settings, options: LaunchOptions) -> VersionGate {
    VersionGate::new(client.clone(), client.clone(), store, settings.gate.clone()).with_options(options)
}
