//! Tracing subscriber setup

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const FOLIO_TARGETS: [&str; 6] = [
    "folio_manifest",
    "folio_store",
    "folio_cms",
    "folio_gate",
    "folio_recompute",
    "folio_cli",
];

/// Filter used when `RUST_LOG` is not set
#[must_use]
pub fn default_directives(debug: bool) -> String {
    if !debug {
        return "info".to_string();
    }
    std::iter::once("info".to_string())
        .chain(FOLIO_TARGETS.iter().map(|target| format!("{target}=debug")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over the defaults. Calling this twice is a no-op.
pub fn init(debug: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(debug)));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    };
    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
