//! Error types for the key-value layer
//!
//! These never leave [`crate::PersistentSlot`]; they exist so backends can
//! report what went wrong and the slot can log it.

use std::path::PathBuf;

/// Errors raised by a [`crate::KeyValueStore`] backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error on the backing file
    #[error("io error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Key cannot be mapped onto the backend
    #[error("invalid key: '{0}'")]
    InvalidKey(String),

    /// Backend refuses all operations
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Value could not be encoded
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_path() {
        let err = StoreError::io_error(
            "/tmp/x.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/x.json"));
    }
}
