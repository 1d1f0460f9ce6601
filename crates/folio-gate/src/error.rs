//! Error types for the version gate

use crate::phase::GatePhase;
use folio_cms::CmsError;
use folio_manifest::SectionKey;

/// Why a reconciliation did not settle as ok
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// Live manifest could not be fetched
    #[error("manifest fetch failed: {0}")]
    Manifest(#[source] CmsError),

    /// A changed section could not be fetched
    #[error("fetching section '{key}' failed: {source}")]
    Section {
        /// Section that failed
        key: SectionKey,
        /// Underlying cause
        #[source]
        source: CmsError,
    },

    /// Reconciliation was dropped before it settled
    #[error("reconciliation was cancelled before it settled")]
    Cancelled,

    /// Phase change not allowed by the gate state machine
    #[error("illegal gate transition {from} -> {to}")]
    IllegalTransition {
        /// Current phase
        from: GatePhase,
        /// Requested phase
        to: GatePhase,
    },
}

impl GateError {
    /// Underlying CMS error, if the failure came from the CMS
    #[must_use]
    pub fn cms(&self) -> Option<&CmsError> {
        match self {
            Self::Manifest(source) | Self::Section { source, .. } => Some(source),
            Self::Cancelled | Self::IllegalTransition { .. } => None,
        }
    }
}
