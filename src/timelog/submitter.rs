//! Outbound ticket action call.

use async_trait::async_trait;
use std::time::Duration;

use super::entry::TimeEntry;
use crate::error::{SyncError, SyncResult};

pub const MOVIDESK_API_BASE: &str = "https://api.movidesk.com/public/v1/tickets";
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Writes one time entry to the helpdesk.
#[async_trait]
pub trait TicketActionSubmitter: Send + Sync {
    async fn submit(&self, entry: &TimeEntry) -> SyncResult<()>;
}

/// Movidesk public API implementation.
#[derive(Debug, Clone)]
pub struct MovideskSubmitter {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl MovideskSubmitter {
    pub fn new(token: impl Into<String>) -> SyncResult<Self> {
        Self::with_base_url(MOVIDESK_API_BASE, token)
    }

    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> SyncResult<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(SyncError::Validation("helpdesk API token is not set".into()));
        }
        let http = reqwest::Client::builder().timeout(SUBMIT_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            token,
        })
    }
}

#[async_trait]
impl TicketActionSubmitter for MovideskSubmitter {
    async fn submit(&self, entry: &TimeEntry) -> SyncResult<()> {
        let response = self
            .http
            .patch(&self.base_url)
            .query(&[("token", self.token.as_str()), ("id", entry.ticket_id.as_str())])
            .json(&entry.to_payload())
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::OK {
            tracing::info!(ticket = %entry.ticket_id, agent = %entry.agent_id, "Time entry logged");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(ticket = %entry.ticket_id, status = status.as_u16(), "Time entry rejected");
        Err(SyncError::Server {
            status: status.as_u16(),
            body,
        })
    }
}
