//! Fetching the published configuration with an offline cache.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::client::FETCH_TIMEOUT;
use crate::document::DocumentPatch;
use crate::error::{SyncError, SyncResult};
use crate::observability::metrics;
use crate::store::{atomic, probe_json, DocumentState};

/// Result of a fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Straight from the server; the cache has been refreshed.
    Fresh(DocumentPatch),
    /// Server unreachable or invalid; served from the cache file.
    Cached(DocumentPatch),
    /// Neither the server nor the cache produced a document.
    Unavailable,
}

impl FetchOutcome {
    pub fn is_ok(&self) -> bool {
        !matches!(self, FetchOutcome::Unavailable)
    }

    pub fn document(&self) -> Option<&DocumentPatch> {
        match self {
            FetchOutcome::Fresh(doc) | FetchOutcome::Cached(doc) => Some(doc),
            FetchOutcome::Unavailable => None,
        }
    }

    /// `(document, ok)`; an empty patch when unavailable.
    pub fn into_parts(self) -> (DocumentPatch, bool) {
        match self {
            FetchOutcome::Fresh(doc) | FetchOutcome::Cached(doc) => (doc, true),
            FetchOutcome::Unavailable => (DocumentPatch::default(), false),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FetchOutcome::Fresh(_) => "fresh",
            FetchOutcome::Cached(_) => "cached",
            FetchOutcome::Unavailable => "unavailable",
        }
    }
}

/// HTTP client for `GET /client-config`.
#[derive(Debug, Clone)]
pub struct RemoteConfigClient {
    http: reqwest::Client,
    url: String,
    cache_path: PathBuf,
}

impl RemoteConfigClient {
    pub fn new(url: impl Into<String>, cache_path: impl Into<PathBuf>) -> SyncResult<Self> {
        Self::with_timeout(url, cache_path, FETCH_TIMEOUT)
    }

    pub fn with_timeout(
        url: impl Into<String>,
        cache_path: impl Into<PathBuf>,
        timeout: Duration,
    ) -> SyncResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
            cache_path: cache_path.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Fetch the server document, falling back to the cache on any failure.
    pub async fn fetch(&self) -> FetchOutcome {
        let outcome = match self.fetch_fresh().await {
            Ok((bytes, doc)) => {
                if let Err(e) = atomic::write_atomic(&self.cache_path, &bytes) {
                    tracing::warn!(
                        path = %self.cache_path.display(),
                        error = %e,
                        "Failed to refresh remote config cache"
                    );
                }
                tracing::info!(url = %self.url, version = ?doc.version, "Fetched remote config");
                FetchOutcome::Fresh(doc)
            }
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "Remote config fetch failed, trying cache");
                match self.read_cache() {
                    DocumentState::Valid(doc) => FetchOutcome::Cached(doc),
                    DocumentState::Absent => FetchOutcome::Unavailable,
                    DocumentState::Corrupt(reason) => {
                        tracing::warn!(
                            path = %self.cache_path.display(),
                            reason = %reason,
                            "Remote config cache is corrupt"
                        );
                        FetchOutcome::Unavailable
                    }
                }
            }
        };
        metrics::record_fetch(outcome.label());
        outcome
    }

    /// State of the local cache file.
    pub fn read_cache(&self) -> DocumentState<DocumentPatch> {
        probe_json(&self.cache_path)
    }

    async fn fetch_fresh(&self) -> SyncResult<(Vec<u8>, DocumentPatch)> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?.to_vec();
        let doc = serde_json::from_slice(&bytes).map_err(|e| SyncError::Corrupt(e.to_string()))?;
        Ok((bytes, doc))
    }
}
