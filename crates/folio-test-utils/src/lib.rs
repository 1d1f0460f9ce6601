//! Testing utilities for the folio workspace
//!
//! In-memory stand-ins for the CMS and the key-value store, so the version
//! gate and the recompute endpoint can be driven without a network.

#![allow(missing_docs)]

use async_trait::async_trait;
use folio_cms::content::{ContactContent, HomeContent, ProjectsContent, SkillsContent, TestimonialsContent};
use folio_cms::content::{AboutContent, ExperienceContent};
use folio_cms::{CmsError, Content, ContentKey, ContentSource, ManifestSource};
use folio_manifest::{SectionKey, VersionManifest};
use folio_store::{KeyValueStore, MemoryStore, StoreError};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Transport-style failure, as a dropped connection would produce
pub fn network_error(path: &str) -> CmsError {
    CmsError::transport(
        path,
        std::io::Error::new(std::io::ErrorKind::ConnectionReset, "NetworkError"),
    )
}

/// Manifest `{globalVersion: global, sections: all = token}`
pub fn manifest(global: &str, token: &str) -> VersionManifest {
    VersionManifest::uniform(global, token)
}

/// Small distinguishable content block for `key`
///
/// `marker` ends up in a title or heading so tests can tell versions apart.
pub fn sample_content(key: ContentKey, marker: &str) -> Content {
    match key {
        ContentKey::Home => Content::Home(HomeContent {
            greeting: marker.to_string(),
            ..HomeContent::default()
        }),
        ContentKey::About => Content::About(AboutContent {
            heading: Some(marker.to_string()),
            ..AboutContent::default()
        }),
        ContentKey::Contact => Content::Contact(ContactContent {
            heading: marker.to_string(),
            description: String::new(),
        }),
        ContentKey::Skills => Content::Skills(SkillsContent {
            title: marker.to_string(),
            ..SkillsContent::default()
        }),
        ContentKey::Experience => Content::Experience(ExperienceContent {
            title: marker.to_string(),
            ..ExperienceContent::default()
        }),
        ContentKey::Testimonials => Content::Testimonials(TestimonialsContent {
            title: marker.to_string(),
            ..TestimonialsContent::default()
        }),
        ContentKey::Projects => Content::Projects(ProjectsContent {
            title: marker.to_string(),
            ..ProjectsContent::default()
        }),
        ContentKey::Socials => Content::Socials(Vec::new()),
    }
}

/// Marker a [`sample_content`] block was built with
pub fn marker_of(content: &Content) -> Option<&str> {
    match content {
        Content::Home(c) => Some(&c.greeting),
        Content::About(c) => c.heading.as_deref(),
        Content::Contact(c) => Some(&c.heading),
        Content::Skills(c) => Some(&c.title),
        Content::Experience(c) => Some(&c.title),
        Content::Testimonials(c) => Some(&c.title),
        Content::Projects(c) => Some(&c.title),
        Content::Socials(_) => None,
    }
}

/// Manifest source answering from a script
///
/// Queued answers are consumed first; once the queue is empty the current
/// manifest (if any) is served, otherwise a network error.
#[derive(Default)]
pub struct ScriptedManifestSource {
    queue: Mutex<VecDeque<Result<VersionManifest, String>>>,
    current: Mutex<Option<VersionManifest>>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
}

impl ScriptedManifestSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always serve `manifest`
    pub fn serving(manifest: VersionManifest) -> Self {
        let source = Self::new();
        source.set(manifest);
        source
    }

    /// Always fail
    pub fn failing() -> Self {
        Self::new()
    }

    pub fn set(&self, manifest: VersionManifest) {
        *self.current.lock() = Some(manifest);
    }

    pub fn push_ok(&self, manifest: VersionManifest) {
        self.queue.lock().push_back(Ok(manifest));
    }

    pub fn push_err(&self, message: &str) {
        self.queue.lock().push_back(Err(message.to_string()));
    }

    /// Delay every answer
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ManifestSource for ScriptedManifestSource {
    async fn fetch_manifest(&self) -> Result<VersionManifest, CmsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self.queue.lock().pop_front();
        match queued {
            Some(Ok(manifest)) => Ok(manifest),
            Some(Err(message)) => Err(network_error(&message)),
            None => self
                .current
                .lock()
                .clone()
                .ok_or_else(|| network_error("/api/manifest")),
        }
    }
}

/// Content source serving [`sample_content`] blocks
///
/// Records every call, supports per-key delays and failures, and tracks how
/// many fetches were in flight at once.
#[derive(Default)]
pub struct FakeContentSource {
    markers: Mutex<HashMap<ContentKey, String>>,
    delays: Mutex<HashMap<ContentKey, Duration>>,
    failing: Mutex<HashSet<ContentKey>>,
    calls: Mutex<Vec<ContentKey>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve blocks carrying `marker` for `key` from now on
    pub fn set_marker(&self, key: ContentKey, marker: &str) {
        self.markers.lock().insert(key, marker.to_string());
    }

    pub fn set_delay(&self, key: ContentKey, delay: Duration) {
        self.delays.lock().insert(key, delay);
    }

    pub fn fail(&self, key: ContentKey) {
        self.failing.lock().insert(key);
    }

    pub fn heal(&self, key: ContentKey) {
        self.failing.lock().remove(&key);
    }

    /// Keys fetched so far, in call order
    pub fn calls(&self) -> Vec<ContentKey> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls_for(&self, key: ContentKey) -> usize {
        self.calls.lock().iter().filter(|k| **k == key).count()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().clear();
    }

    /// Highest number of fetches observed running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSource for FakeContentSource {
    async fn fetch_content(&self, key: ContentKey) -> Result<Content, CmsError> {
        self.calls.lock().push(key);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.lock().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.lock().contains(&key) {
            return Err(network_error(key.path()));
        }
        let marker = self
            .markers
            .lock()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| format!("{key}-v1"));
        Ok(sample_content(key, &marker))
    }
}

/// Memory store whose operations can be switched off, counting writes
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    fail_get: AtomicBool,
    fail_set: AtomicBool,
    fail_remove: AtomicBool,
    fail_set_keys: Mutex<HashSet<String>>,
    writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, on: bool) {
        self.fail_get.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_set.store(on, Ordering::SeqCst);
    }

    /// Fail writes to `key` only
    pub fn fail_writes_for(&self, key: &str, on: bool) {
        let mut keys = self.fail_set_keys.lock();
        if on {
            keys.insert(key.to_string());
        } else {
            keys.remove(key);
        }
    }

    pub fn fail_removes(&self, on: bool) {
        self.fail_remove.store(on, Ordering::SeqCst);
    }

    /// Successful and failed `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("get {key}")));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_set.load(Ordering::SeqCst) || self.fail_set_keys.lock().contains(key) {
            return Err(StoreError::Unavailable(format!("set {key}")));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("remove {key}")));
        }
        self.inner.remove(key)
    }
}

/// Every tracked section, as cache keys
pub fn section_keys() -> Vec<ContentKey> {
    SectionKey::ALL.into_iter().map(ContentKey::from).collect()
}
