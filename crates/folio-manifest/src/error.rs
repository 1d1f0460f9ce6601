//! Error types for manifest handling

/// Errors produced while parsing manifest data
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Section name outside the tracked set
    #[error("unknown section: '{0}'")]
    UnknownSection(String),

    /// Serialized manifest could not be decoded
    #[error("malformed manifest: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_section_display() {
        let err = ManifestError::UnknownSection("blog".to_string());
        assert_eq!(err.to_string(), "unknown section: 'blog'");
    }

    #[test]
    fn json_error_conversion() {
        let err: ManifestError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("malformed manifest"));
    }
}
