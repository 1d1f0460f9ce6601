//! Version gate orchestration
//!
//! The gate is the only writer of the content cache and of the persisted
//! manifest. Its phase lives behind a mutex and every change goes through
//! [`validate_transition`]; the published [`GateState`] is a read-only view
//! for subscribers.

use crate::cache::ContentCache;
use crate::config::GateConfig;
use crate::error::GateError;
use crate::options::LaunchOptions;
use crate::phase::{validate_transition, GatePhase};
use folio_cms::{CmsError, Content, ContentKey, ContentSource, ManifestSource};
use folio_manifest::{diff_sections, SectionKey, VersionManifest};
use folio_store::{
    KeyValueStore, ManifestStore, Persistence, PersistentSlot, SharedStore, ALL_CACHE_KEYS, CONTENT_SNAPSHOT_KEY,
};
use futures::future::try_join_all;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Instant;

/// Published view of the gate
#[derive(Debug, Clone, Default)]
pub struct GateState {
    /// Current phase
    pub phase: GatePhase,
    /// Outcome of the last settled reconciliation; kept while a refetch runs
    pub ok: bool,
    /// Last manifest reconciled successfully
    pub manifest: Option<VersionManifest>,
    /// Why the last reconciliation failed
    pub error: Option<Arc<GateError>>,
}

impl GateState {
    /// Whether the gate has settled at least once and is not reconciling
    #[inline]
    #[must_use]
    pub fn ready(&self) -> bool {
        self.phase.is_ready()
    }
}

#[derive(Debug, Default)]
struct Machine {
    phase: GatePhase,
    ok: bool,
    last_run: Option<Instant>,
}

/// Reconciles the content cache against the live manifest
pub struct VersionGate {
    manifests: Arc<dyn ManifestSource>,
    content: Arc<dyn ContentSource>,
    store: SharedStore,
    saved: ManifestStore<SharedStore>,
    snapshot: PersistentSlot<SharedStore, Vec<Content>>,
    cache: ContentCache,
    config: GateConfig,
    options: LaunchOptions,
    machine: Mutex<Machine>,
    state: watch::Sender<GateState>,
    mounted: AtomicBool,
}

impl VersionGate {
    /// Create gate over the given sources and store
    #[must_use]
    pub fn new(
        manifests: Arc<dyn ManifestSource>,
        content: Arc<dyn ContentSource>,
        store: SharedStore,
        config: GateConfig,
    ) -> Self {
        let (state, _) = watch::channel(GateState::default());
        Self {
            manifests,
            content,
            saved: ManifestStore::manifest(Arc::clone(&store)),
            snapshot: PersistentSlot::new(Arc::clone(&store), CONTENT_SNAPSHOT_KEY),
            store,
            cache: ContentCache::from_config(&config),
            config,
            options: LaunchOptions::default(),
            machine: Mutex::new(Machine::default()),
            state,
            mounted: AtomicBool::new(true),
        }
    }

    /// With launch options
    #[inline]
    #[must_use]
    pub fn with_options(mut self, options: LaunchOptions) -> Self {
        self.options = options;
        self
    }

    /// Content cache readers should use
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Launch options in use
    #[inline]
    #[must_use]
    pub fn options(&self) -> LaunchOptions {
        self.options
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> GatePhase {
        self.machine.lock().phase
    }

    /// Snapshot of the published state
    #[must_use]
    pub fn state(&self) -> GateState {
        self.state.borrow().clone()
    }

    /// Watch published state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GateState> {
        self.state.subscribe()
    }

    /// Where the saved manifest currently lives
    #[must_use]
    pub fn persistence(&self) -> Persistence {
        self.saved.persistence()
    }

    /// Last reconciled manifest as persisted
    #[must_use]
    pub fn saved_manifest(&self) -> Option<VersionManifest> {
        self.saved.load()
    }

    /// Stop publishing state
    ///
    /// A reconciliation already in flight still runs to completion and
    /// still warms the cache and the store; only its state update is
    /// dropped.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    /// Session bootstrap: apply launch options, hydrate, reconcile
    ///
    /// Returns whether the reconciliation settled as ok. Calling it again
    /// after the first bootstrap behaves like [`VersionGate::refetch`].
    pub async fn start(&self) -> bool {
        if self.phase() != GatePhase::Uninitialized {
            tracing::debug!("Gate already started, refetching instead");
            return self.refetch().await;
        }

        if self.options.clear_cache {
            self.clear_persisted().await;
        }
        self.hydrate().await;
        self.run(false).await
    }

    /// Re-run reconciliation
    ///
    /// Ignored while another reconciliation is in flight, or while the
    /// refetch cooldown is active; either way the current `ok` comes back.
    pub async fn refetch(&self) -> bool {
        self.run(true).await
    }

    /// Refetch and call `reload` only if the gate settles as ok
    pub async fn retry_and_reload<F: FnOnce()>(&self, reload: F) -> bool {
        let ok = self.refetch().await;
        if ok {
            reload();
        } else {
            tracing::debug!("Retry failed, not reloading");
        }
        ok
    }

    /// Read a content block through the cache, fetching it on a miss
    ///
    /// # Errors
    ///
    /// The fetch error when the block is not cached and cannot be fetched.
    pub async fn content(&self, key: ContentKey) -> Result<Arc<Content>, Arc<CmsError>> {
        self.cache.get_or_fetch(key, self.content.as_ref()).await
    }

    async fn run(&self, manual: bool) -> bool {
        if let Err(ok) = self.begin(manual) {
            return ok;
        }

        let in_flight = InFlight { gate: self, armed: true };
        let outcome = self.reconcile().await;
        in_flight.disarm();

        match outcome {
            Ok(live) => {
                tracing::info!("Reconciled against global version {}", live.global_version);
                self.settle(true, |state| {
                    state.manifest = Some(live);
                    state.error = None;
                })
            }
            Err(e) => {
                tracing::error!("Reconciliation failed: {}", e);
                self.settle(false, |state| state.error = Some(Arc::new(e)))
            }
        }
    }

    /// Enter `reconciling`, or hand back the current `ok` when the call is ignored
    fn begin(&self, manual: bool) -> Result<(), bool> {
        let mut machine = self.machine.lock();

        if let Err(e) = validate_transition(machine.phase, GatePhase::Reconciling) {
            tracing::debug!("Refetch ignored: {}", e);
            return Err(machine.ok);
        }

        if manual && !self.options.bypass_cooldown {
            if let (Some(cooldown), Some(last)) = (self.config.refetch_cooldown, machine.last_run) {
                if last.elapsed() < cooldown {
                    tracing::debug!("Refetch ignored: cooldown of {:?} still active", cooldown);
                    return Err(machine.ok);
                }
            }
        }

        machine.phase = GatePhase::Reconciling;
        machine.last_run = Some(Instant::now());
        self.publish(|state| state.phase = GatePhase::Reconciling);
        Ok(())
    }

    /// Leave `reconciling` and publish the outcome
    fn settle(&self, ok: bool, update: impl FnOnce(&mut GateState)) -> bool {
        let mut machine = self.machine.lock();
        let to = GatePhase::Ready { ok };
        if let Err(e) = validate_transition(machine.phase, to) {
            tracing::error!("Gate state corrupted: {}", e);
            return machine.ok;
        }

        machine.phase = to;
        machine.ok = ok;
        self.publish(|state| {
            state.phase = to;
            state.ok = ok;
            update(state);
        });
        ok
    }

    /// Leave `reconciling` after the run was dropped mid-flight
    fn abandon(&self) {
        let mut machine = self.machine.lock();
        let to = GatePhase::Ready { ok: false };
        if validate_transition(machine.phase, to).is_err() {
            return;
        }

        tracing::warn!("Reconciliation dropped before settling");
        machine.phase = to;
        machine.ok = false;
        self.publish(|state| {
            state.phase = to;
            state.ok = false;
            state.error = Some(Arc::new(GateError::Cancelled));
        });
    }

    fn publish(&self, update: impl FnOnce(&mut GateState)) {
        if self.mounted.load(Ordering::SeqCst) {
            self.state.send_modify(update);
        }
    }

    async fn reconcile(&self) -> Result<VersionManifest, GateError> {
        let saved = self.saved.load();
        tracing::debug!("Saved manifest: {:?}", saved);

        let live = self.manifests.fetch_manifest().await.map_err(GateError::Manifest)?;
        tracing::debug!("Live manifest: {:?}", live);

        let changed = diff_sections(saved.as_ref(), &live);
        tracing::debug!("Changed sections: {:?}", changed);

        let mut content_durable = true;
        if !changed.is_empty() {
            let fetched = try_join_all(changed.iter().map(|&key| self.fetch_section(key))).await?;
            for content in fetched {
                tracing::debug!("Seeding cache for '{}'", content.key());
                self.cache.seed(content).await;
            }
            content_durable = self.snapshot.save(&self.cache.snapshot()) == Persistence::Durable;
        }

        // a durable manifest must never describe content that did not land durably
        if !content_durable {
            tracing::warn!("Content snapshot not persisted, keeping manifest in memory only");
            self.saved.save_in_memory(&live);
        } else if self.saved.save(&live) == Persistence::MemoryOnly {
            tracing::debug!("Manifest kept in memory only for this session");
        }
        Ok(live)
    }

    async fn fetch_section(&self, key: SectionKey) -> Result<Content, GateError> {
        tracing::debug!("Fetching changed section '{}'", key);
        self.content
            .fetch_content(ContentKey::from(key))
            .await
            .map_err(|source| GateError::Section { key, source })
    }

    async fn hydrate(&self) {
        let Some(blocks) = self.snapshot.load() else {
            return;
        };
        tracing::debug!("Hydrating {} cached blocks", blocks.len());
        self.cache.hydrate(blocks).await;
    }

    async fn clear_persisted(&self) {
        for key in ALL_CACHE_KEYS {
            if let Err(e) = self.store.remove(key) {
                tracing::debug!("Could not remove '{}': {}", key, e);
            }
        }
        self.saved.clear();
        self.snapshot.clear();
        self.cache.clear().await;
        tracing::info!("Cleared local caches");
    }
}

/// Settles the gate as failed if a run is dropped between `begin` and `settle`
struct InFlight<'a> {
    gate: &'a VersionGate,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.gate.abandon();
        }
    }
}

impl std::fmt::Debug for VersionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionGate")
            .field("phase", &self.phase())
            .field("config", &self.config)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
