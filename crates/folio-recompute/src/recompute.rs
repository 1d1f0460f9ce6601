//! Manifest recompute
//!
//! Reads the `updatedAt` of each tracked entry, falls back to the stored
//! manifest for any section that does not resolve, derives a new global
//! version and writes the result back. A section that fails to resolve is
//! never written as `null`: if the stored manifest cannot be read either,
//! the whole recompute fails and nothing is written.

use crate::error::RecomputeError;
use chrono::{DateTime, Utc};
use folio_cms::{CmsClient, CmsError};
use folio_manifest::version::derive_global_version;
use folio_manifest::{ManifestFields, SectionKey, SectionVersions, VersionManifest};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a successful recompute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recomputed {
    /// Fields written to the CMS
    pub updated: ManifestFields,
    /// Derived global token
    pub global_version: String,
}

/// Webhook payload, as far as recompute cares
///
/// Different CMS versions name the changed model differently; the first of
/// `model`, `contentType`, `uid` that is present wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    /// Lifecycle event name (`entry.update`, `entry.publish`, …)
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    uid: Option<String>,
}

impl WebhookEvent {
    /// Parse a webhook body; anything unreadable yields an empty event
    #[must_use]
    pub fn parse(body: &[u8]) -> Self {
        if body.is_empty() {
            return Self::default();
        }
        serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    /// Model identifier named by the payload
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model
            .as_deref()
            .or(self.content_type.as_deref())
            .or(self.uid.as_deref())
    }

    /// Section the changed model belongs to, if tracked
    #[must_use]
    pub fn section(&self) -> Option<SectionKey> {
        self.model().and_then(|model| {
            SectionKey::from_model_uid(model).or_else(|| model.parse().ok())
        })
    }
}

/// Recompute the manifest and write it back
///
/// # Errors
///
/// - [`RecomputeError::Config`] when the CMS base URL or manifest token is
///   missing; nothing is requested in that case
/// - [`RecomputeError::Upstream`] when a section cannot be resolved and the
///   stored manifest cannot be read, or when the write fails
pub async fn recompute(client: &CmsClient, now: DateTime<Utc>) -> Result<Recomputed, RecomputeError> {
    let config = client.config();
    if config.base().is_none() {
        return Err(RecomputeError::Config("Missing CMS base URL".to_string()));
    }
    if config.manifest_token.is_none() {
        return Err(RecomputeError::Config("Missing manifest token".to_string()));
    }

    let fetched = join_all(SectionKey::ALL.into_iter().map(|key| async move {
        (key, client.fetch_updated_at(key).await)
    }))
    .await;

    let mut sections = SectionVersions::new();
    let mut unresolved = Vec::new();
    for (key, result) in fetched {
        match result {
            Ok(Some(updated_at)) => sections.set(key, Some(updated_at)),
            Ok(None) => {
                tracing::warn!("No updatedAt for {}, keeping stored value", key);
                unresolved.push(key);
            }
            Err(e) => {
                tracing::warn!("Fetching updatedAt for {} failed, keeping stored value: {}", key, e);
                unresolved.push(key);
            }
        }
    }

    if !unresolved.is_empty() {
        let stored = stored_manifest(client).await?;
        for key in unresolved {
            sections.set(key, stored.section(key).map(str::to_string));
        }
    }

    let global_version = derive_global_version(&sections, now);
    let manifest = VersionManifest::new(global_version.clone(), sections);
    let updated = ManifestFields::from(&manifest);

    client.put_manifest(updated.clone()).await?;
    tracing::info!("Manifest recomputed: {}", global_version);

    Ok(Recomputed {
        updated,
        global_version,
    })
}

async fn stored_manifest(client: &CmsClient) -> Result<VersionManifest, CmsError> {
    client.fetch_stored_manifest().await.inspect_err(|e| {
        tracing::error!("Stored manifest unavailable, refusing to write partial manifest: {}", e);
    })
}
