//! Reachability guard
//!
//! Tells "the CMS is down" apart from "content is merely stale". A failed
//! probe flips the guard to down until a later [`ReachabilityGuard::retry`]
//! succeeds. Probing never errors.

use async_trait::async_trait;
use folio_cms::CmsClient;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Something that can cheaply tell whether the CMS origin answers
#[async_trait]
pub trait Probe: Send + Sync {
    /// `true` when the origin answered in time
    async fn probe(&self) -> bool;
}

#[async_trait]
impl Probe for CmsClient {
    async fn probe(&self) -> bool {
        CmsClient::probe(self).await
    }
}

#[async_trait]
impl<P: Probe + ?Sized> Probe for Arc<P> {
    async fn probe(&self) -> bool {
        (**self).probe().await
    }
}

/// Tracks whether the CMS origin is reachable
#[derive(Debug)]
pub struct ReachabilityGuard<P> {
    probe: P,
    down: AtomicBool,
}

impl<P: Probe> ReachabilityGuard<P> {
    /// Create guard; the origin counts as up until probed
    #[must_use]
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            down: AtomicBool::new(false),
        }
    }

    /// Probe once and record the outcome; returns whether the origin is up
    pub async fn check(&self) -> bool {
        let up = self.probe.probe().await;
        let was_down = self.down.swap(!up, Ordering::SeqCst);
        match (was_down, up) {
            (false, false) => tracing::warn!("CMS origin is unreachable"),
            (true, true) => tracing::info!("CMS origin is reachable again"),
            _ => {}
        }
        up
    }

    /// Manual retry from the "server may be down" overlay
    pub async fn retry(&self) -> bool {
        tracing::debug!("Retrying CMS reachability probe");
        self.check().await
    }

    /// Whether the last probe failed
    #[inline]
    #[must_use]
    pub fn is_down(&self) -> bool {
        self.down.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Scripted {
        answers: parking_lot::Mutex<Vec<bool>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Probe for Scripted {
        async fn probe(&self) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answers.lock().pop().unwrap_or(true)
        }
    }

    fn scripted(mut answers: Vec<bool>) -> Scripted {
        answers.reverse();
        Scripted {
            answers: parking_lot::Mutex::new(answers),
            calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn failed_probe_marks_down_until_retry_succeeds() {
        let guard = ReachabilityGuard::new(scripted(vec![false, false, true]));
        assert!(!guard.is_down());

        assert!(!guard.check().await);
        assert!(guard.is_down());

        assert!(!guard.retry().await);
        assert!(guard.is_down());

        assert!(guard.retry().await);
        assert!(!guard.is_down());
    }

    #[tokio::test]
    async fn one_probe_per_check() {
        let guard = ReachabilityGuard::new(scripted(vec![true]));
        guard.check().await;
        assert_eq!(guard.probe.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unconfigured_client_reads_as_down() {
        let client = CmsClient::new(folio_cms::CmsConfig::default()).unwrap();
        let guard = ReachabilityGuard::new(client);
        assert!(!guard.check().await);
        assert!(guard.is_down());
    }
}
