//! Gate state machine
//!
//! ```text
//! uninitialized -> reconciling -> ready(ok) | ready(error)
//!                       ^                 |
//!                       +---- refetch ----+
//! ```
//!
//! `reconciling -> reconciling` is illegal; that is what keeps two
//! reconciliations from overlapping.

use crate::error::GateError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Phase of the version gate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePhase {
    /// Not started
    #[default]
    Uninitialized,
    /// Reconciliation in flight
    Reconciling,
    /// Settled; `ok` is false when freshness could not be established
    Ready {
        /// Whether the last reconciliation succeeded
        ok: bool,
    },
}

impl GatePhase {
    /// Whether the gate has settled
    #[inline]
    #[must_use]
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

impl Display for GatePhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("uninitialized"),
            Self::Reconciling => f.write_str("reconciling"),
            Self::Ready { ok: true } => f.write_str("ready(ok)"),
            Self::Ready { ok: false } => f.write_str("ready(error)"),
        }
    }
}

/// Phases reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: GatePhase) -> Vec<GatePhase> {
    use GatePhase::{Ready, Reconciling, Uninitialized};
    match from {
        Uninitialized | Ready { .. } => vec![Reconciling],
        Reconciling => vec![Ready { ok: true }, Ready { ok: false }],
    }
}

/// Check one transition
///
/// # Errors
///
/// [`GateError::IllegalTransition`] when `to` is not reachable from `from`.
pub fn validate_transition(from: GatePhase, to: GatePhase) -> Result<(), GateError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(GateError::IllegalTransition { from, to })
    }
}
