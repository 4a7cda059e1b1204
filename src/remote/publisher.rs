//! Pushing local changes to the central server.

use reqwest::StatusCode;
use std::time::Duration;

use crate::config::client::{ClientSettings, PUBLISH_TIMEOUT};
use crate::document::{ConfigDocument, DocumentPatch, WriteSummary};
use crate::error::{SyncError, SyncResult};
use crate::observability::metrics;
use crate::remote::admin_key::AdminKeyLocator;

/// Header carrying the admin key on writes.
pub const CONFIG_KEY_HEADER: &str = "X-Config-Key";

/// Authenticated `PUT /client-config` client. Performs no retries.
#[derive(Debug, Clone)]
pub struct ConfigPublisher {
    http: reqwest::Client,
    endpoint: Option<String>,
    keys: AdminKeyLocator,
}

impl ConfigPublisher {
    pub fn new(endpoint: Option<String>, keys: AdminKeyLocator) -> SyncResult<Self> {
        Self::with_timeout(endpoint, keys, PUBLISH_TIMEOUT)
    }

    /// Endpoint and timeout from the client settings.
    pub fn from_settings(settings: &ClientSettings, keys: AdminKeyLocator) -> SyncResult<Self> {
        Self::with_timeout(settings.remote_url.clone(), keys, settings.publish_timeout)
    }

    pub fn with_timeout(
        endpoint: Option<String>,
        keys: AdminKeyLocator,
        timeout: Duration,
    ) -> SyncResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            keys,
        })
    }

    /// Publish the shareable fields of `doc`.
    ///
    /// Fails without any network I/O when no endpoint or admin key is
    /// available.
    pub async fn publish(&self, doc: &ConfigDocument) -> SyncResult<WriteSummary> {
        let result = self.try_publish(doc).await;
        match &result {
            Ok(summary) => {
                metrics::record_publish("ok");
                tracing::info!(
                    version = summary.version,
                    users = summary.usuarios_count,
                    has_token = summary.has_token,
                    "Config published"
                );
            }
            Err(e) => {
                metrics::record_publish("failed");
                tracing::warn!(error = %e, "Config publish failed");
            }
        }
        result
    }

    async fn try_publish(&self, doc: &ConfigDocument) -> SyncResult<WriteSummary> {
        let endpoint = self.endpoint.as_deref().ok_or(SyncError::NoEndpoint)?;
        let key = self.keys.discover().ok_or(SyncError::AdminKeyMissing)?;

        let response = self
            .http
            .put(endpoint)
            .header(CONFIG_KEY_HEADER, key.as_str())
            .json(&DocumentPatch::shared_fields(doc))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::OK => serde_json::from_str(&body).map_err(|e| {
                SyncError::Corrupt(format!("unexpected publish response: {}", e))
            }),
            StatusCode::UNAUTHORIZED => Err(SyncError::KeyRejected(body)),
            _ => Err(SyncError::Server {
                status: status.as_u16(),
                body,
            }),
        }
    }
}
