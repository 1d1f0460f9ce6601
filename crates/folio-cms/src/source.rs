//! Seams the version gate is written against

use crate::content::{Content, ContentKey};
use crate::error::CmsError;
use async_trait::async_trait;
use folio_manifest::VersionManifest;
use std::sync::Arc;

/// Where the live manifest comes from
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Fetch the live manifest; never served from a cache
    async fn fetch_manifest(&self) -> Result<VersionManifest, CmsError>;
}

/// Where section content comes from
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch and normalize one content block
    async fn fetch_content(&self, key: ContentKey) -> Result<Content, CmsError>;
}

#[async_trait]
impl<T: ManifestSource + ?Sized> ManifestSource for Arc<T> {
    async fn fetch_manifest(&self) -> Result<VersionManifest, CmsError> {
        (**self).fetch_manifest().await
    }
}

#[async_trait]
impl<T: ContentSource + ?Sized> ContentSource for Arc<T> {
    async fn fetch_content(&self, key: ContentKey) -> Result<Content, CmsError> {
        (**self).fetch_content(key).await
    }
}
