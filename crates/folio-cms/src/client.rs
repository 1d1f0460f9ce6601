//! HTTP client for the CMS
//!
//! Content reads carry the API token; manifest writes and the server-side
//! `updatedAt` reads carry the manifest token. Every request is sent as is:
//! no retries, no caching.

use crate::config::CmsConfig;
use crate::content::{Content, ContentKey};
use crate::error::CmsError;
use crate::source::{ContentSource, ManifestSource};
use async_trait::async_trait;
use folio_manifest::wire::{extract_updated_at, manifest_fields_query, normalize_manifest};
use folio_manifest::{ManifestFields, SectionKey, VersionManifest};
use reqwest::header::{HeaderValue, ACCEPT, CACHE_CONTROL};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Manifest entry path
pub const MANIFEST_PATH: &str = "/api/manifest";

/// Raw upstream answer relayed by the manifest read-proxy
#[derive(Debug, Clone)]
pub struct RelayedResponse {
    /// Upstream status code
    pub status: u16,
    /// Upstream body, unparsed
    pub body: String,
}

/// CMS HTTP client
#[derive(Debug, Clone)]
pub struct CmsClient {
    config: CmsConfig,
    http: reqwest::Client,
}

impl CmsClient {
    /// Create client from configuration
    ///
    /// A missing base URL is not an error here; each call checks it before
    /// sending anything.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::Config`] if the HTTP client cannot be built.
    pub fn new(config: CmsConfig) -> Result<Self, CmsError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| CmsError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CmsConfig {
        &self.config
    }

    fn url(&self, path: &str) -> Result<String, CmsError> {
        let base = self
            .config
            .base()
            .ok_or_else(|| CmsError::Config("CMS base URL is not configured".to_string()))?;
        Ok(format!("{base}{path}"))
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> Result<RequestBuilder, CmsError> {
        let mut request = self
            .http
            .request(method, self.url(path)?)
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    fn manifest_token(&self) -> Option<&str> {
        self.config
            .manifest_token
            .as_deref()
            .or(self.config.api_token.as_deref())
    }

    async fn send_json(&self, path: &str, request: RequestBuilder) -> Result<Value, CmsError> {
        let response = request
            .send()
            .await
            .map_err(|e| CmsError::transport(path, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("CMS returned {} for {}", status, path);
            return Err(CmsError::Status {
                status: status.as_u16(),
                path: path.to_string(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| CmsError::decode(path, e))
    }

    /// GET `path` with the content read token
    ///
    /// # Errors
    ///
    /// Config, transport, status or decode failures.
    pub async fn get_json(&self, path: &str) -> Result<Value, CmsError> {
        let request = self.request(Method::GET, path, self.config.api_token.as_deref())?;
        self.send_json(path, request).await
    }

    /// Fetch the live manifest, bypassing any HTTP cache
    ///
    /// # Errors
    ///
    /// Fails before sending when no base URL is configured; otherwise
    /// transport, status and decode failures are returned as is.
    pub async fn fetch_manifest(&self) -> Result<VersionManifest, CmsError> {
        let path = format!("{MANIFEST_PATH}?fields={}", manifest_fields_query());
        let request = self
            .request(Method::GET, &path, self.config.api_token.as_deref())?
            .header(CACHE_CONTROL, HeaderValue::from_static("no-store"));

        tracing::debug!("Fetching live manifest from {}", path);
        let envelope = self.send_json(&path, request).await?;
        Ok(normalize_manifest(&envelope))
    }

    /// Manifest as stored, read with the manifest token
    ///
    /// # Errors
    ///
    /// Same as [`CmsClient::fetch_manifest`].
    pub async fn fetch_stored_manifest(&self) -> Result<VersionManifest, CmsError> {
        let path = format!("{MANIFEST_PATH}?fields={}", manifest_fields_query());
        let request = self
            .request(Method::GET, &path, self.manifest_token())?
            .header(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        let envelope = self.send_json(&path, request).await?;
        Ok(normalize_manifest(&envelope))
    }

    /// Fetch and normalize one content block
    ///
    /// # Errors
    ///
    /// Config, transport, status or decode failures.
    pub async fn fetch_content(&self, key: ContentKey) -> Result<Content, CmsError> {
        tracing::debug!("Fetching content '{}'", key);
        let envelope = self.get_json(key.path()).await?;
        Content::decode(key, &envelope, self.config.base())
    }

    /// `updatedAt` of a section's single-type entry
    ///
    /// `Ok(None)` means the entry answered but carries no timestamp.
    ///
    /// # Errors
    ///
    /// Config, transport, status or decode failures.
    pub async fn fetch_updated_at(&self, section: SectionKey) -> Result<Option<String>, CmsError> {
        let path = format!("/api/{}?fields=updatedAt", section.content_type());
        let request = self.request(Method::GET, &path, self.manifest_token())?;
        let envelope = self.send_json(&path, request).await?;
        Ok(extract_updated_at(&envelope))
    }

    /// Write manifest fields back to the CMS
    ///
    /// # Errors
    ///
    /// [`CmsError::Config`] when no manifest token is configured; any
    /// non-2xx answer is a [`CmsError::Status`].
    pub async fn put_manifest(&self, fields: ManifestFields) -> Result<(), CmsError> {
        let token = self
            .config
            .manifest_token
            .as_deref()
            .ok_or_else(|| CmsError::Config("manifest token is not configured".to_string()))?;

        let request = self
            .request(Method::PUT, MANIFEST_PATH, Some(token))?
            .json(&fields.into_write_body());
        self.send_json(MANIFEST_PATH, request).await.map(|_| ())
    }

    /// Relay the manifest entry unparsed, for the read-proxy
    ///
    /// # Errors
    ///
    /// Config and transport failures only; any status is relayed.
    pub async fn relay_manifest(&self) -> Result<RelayedResponse, CmsError> {
        let request = self.request(Method::GET, MANIFEST_PATH, self.manifest_token())?;
        let response = request
            .send()
            .await
            .map_err(|e| CmsError::transport(MANIFEST_PATH, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CmsError::transport(MANIFEST_PATH, e))?;
        Ok(RelayedResponse { status, body })
    }

    /// Whether the CMS origin answers within the probe timeout
    ///
    /// Sends HEAD to the health path and falls back to GET when HEAD fails
    /// at the transport level or is not supported. Any status below 500
    /// counts as up. Never errors; a missing base URL reads as down.
    pub async fn probe(&self) -> bool {
        let path = self.config.health_path.as_str();
        let timeout = self.config.probe_timeout;

        match self.probe_once(Method::HEAD, path, timeout).await {
            Some(status) if status != StatusCode::METHOD_NOT_ALLOWED && status != StatusCode::NOT_IMPLEMENTED => {
                status.as_u16() < 500
            }
            _ => self
                .probe_once(Method::GET, path, timeout)
                .await
                .is_some_and(|status| status.as_u16() < 500),
        }
    }

    async fn probe_once(&self, method: Method, path: &str, timeout: Duration) -> Option<StatusCode> {
        let request = self.request(method.clone(), path, None).ok()?.timeout(timeout);
        match request.send().await {
            Ok(response) => Some(response.status()),
            Err(e) => {
                tracing::debug!("Probe {} {} failed: {}", method, path, e);
                None
            }
        }
    }
}

#[async_trait]
impl ManifestSource for CmsClient {
    async fn fetch_manifest(&self) -> Result<VersionManifest, CmsError> {
        CmsClient::fetch_manifest(self).await
    }
}

#[async_trait]
impl ContentSource for CmsClient {
    async fn fetch_content(&self, key: ContentKey) -> Result<Content, CmsError> {
        CmsClient::fetch_content(self, key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_base_url_fails_before_any_request() {
        let client = CmsClient::new(CmsConfig::default()).unwrap();

        let err = client.fetch_manifest().await.unwrap_err();
        assert!(err.is_config());
        let err = client.fetch_content(ContentKey::Home).await.unwrap_err();
        assert!(err.is_config());
        assert!(!client.probe().await);
    }

    #[tokio::test]
    async fn put_requires_manifest_token() {
        let client = CmsClient::new(CmsConfig::new().with_base_url("http://127.0.0.1:9")).unwrap();
        let err = client.put_manifest(ManifestFields::default()).await.unwrap_err();
        assert!(err.is_config());
    }
}
