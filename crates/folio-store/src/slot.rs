//! Degrading persistence slot
//!
//! A [`PersistentSlot`] owns one key of a [`KeyValueStore`] and stores a
//! JSON-encoded value there. It never returns an error:
//!
//! - read failure or undecodable entry: `load` yields the in-memory copy
//!   (initially `None`); an undecodable entry is also removed, best-effort
//! - write failure: the value is kept in memory and later loads see it
//!
//! After any such failure the slot stays in [`Persistence::MemoryOnly`] for
//! the rest of its lifetime and stops touching the backend for reads and
//! writes.

use crate::kv::KeyValueStore;
use crate::MANIFEST_KEY;
use folio_manifest::VersionManifest;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// Where a slot currently keeps its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Backend is healthy; values survive restarts
    Durable,
    /// Backend failed this session; values live in memory only
    MemoryOnly,
}

#[derive(Debug)]
struct SlotState<T> {
    mode: Persistence,
    memory: Option<T>,
}

/// One persisted value under a fixed key
#[derive(Debug)]
pub struct PersistentSlot<S, T> {
    store: S,
    key: &'static str,
    state: Mutex<SlotState<T>>,
    _value: PhantomData<fn() -> T>,
}

/// Slot holding the last reconciled manifest
pub type ManifestStore<S> = PersistentSlot<S, VersionManifest>;

impl<S: KeyValueStore> PersistentSlot<S, VersionManifest> {
    /// Manifest slot under [`MANIFEST_KEY`]
    #[must_use]
    pub fn manifest(store: S) -> Self {
        Self::new(store, MANIFEST_KEY)
    }
}

impl<S, T> PersistentSlot<S, T>
where
    S: KeyValueStore,
    T: Serialize + DeserializeOwned + Clone,
{
    /// Create slot for `key`
    #[must_use]
    pub fn new(store: S, key: &'static str) -> Self {
        Self {
            store,
            key,
            state: Mutex::new(SlotState {
                mode: Persistence::Durable,
                memory: None,
            }),
            _value: PhantomData,
        }
    }

    /// Key this slot owns
    #[inline]
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Current persistence mode
    #[must_use]
    pub fn persistence(&self) -> Persistence {
        self.state.lock().mode
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Last saved value, or `None` if there is none or it cannot be read
    pub fn load(&self) -> Option<T> {
        let mut state = self.state.lock();
        if state.mode == Persistence::MemoryOnly {
            return state.memory.clone();
        }

        match self.store.get(self.key) {
            Ok(None) => None,
            Ok(Some(text)) => match serde_json::from_str::<Option<T>>(&text) {
                Ok(value) => {
                    state.memory.clone_from(&value);
                    value
                }
                Err(e) => {
                    tracing::warn!("Discarding unreadable entry '{}': {}", self.key, e);
                    if let Err(e) = self.store.remove(self.key) {
                        tracing::debug!("Could not clear entry '{}': {}", self.key, e);
                    }
                    state.mode = Persistence::MemoryOnly;
                    state.memory = None;
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Store read for '{}' failed, keeping values in memory: {}", self.key, e);
                state.mode = Persistence::MemoryOnly;
                state.memory.clone()
            }
        }
    }

    /// Save `value`; reports where it ended up
    pub fn save(&self, value: &T) -> Persistence {
        let mut state = self.state.lock();
        state.memory = Some(value.clone());
        if state.mode == Persistence::MemoryOnly {
            return Persistence::MemoryOnly;
        }

        let written = serde_json::to_string(value)
            .map_err(crate::StoreError::from)
            .and_then(|text| self.store.set(self.key, &text));

        if let Err(e) = written {
            tracing::warn!("Store write for '{}' failed, keeping values in memory: {}", self.key, e);
            state.mode = Persistence::MemoryOnly;
        }
        state.mode
    }

    /// Keep `value` for this session only and drop the durable entry
    ///
    /// Used when the value must not outlive data it depends on that could
    /// not be persisted. The slot stays in [`Persistence::MemoryOnly`].
    pub fn save_in_memory(&self, value: &T) {
        let mut state = self.state.lock();
        state.memory = Some(value.clone());
        state.mode = Persistence::MemoryOnly;
        if let Err(e) = self.store.remove(self.key) {
            tracing::warn!("Could not drop durable entry '{}': {}", self.key, e);
        }
    }

    /// Forget the value, in memory and (best-effort) in the backend
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.memory = None;
        if let Err(e) = self.store.remove(self.key) {
            tracing::debug!("Could not clear entry '{}': {}", self.key, e);
        }
    }
}
