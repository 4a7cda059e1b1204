//! Central server settings, sourced from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable holding the admin secret for writes.
pub const ADMIN_KEY_ENV_VAR: &str = "CONFIG_ADMIN_KEY";

/// Settings for the config server.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Path of the authoritative document.
    pub document_path: PathBuf,

    /// Secret expected in `X-Config-Key`. `None` rejects every write.
    pub admin_key: Option<String>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum accepted request body.
    pub max_body_bytes: usize,

    /// Prometheus exporter address, if enabled.
    pub metrics_address: Option<SocketAddr>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            document_path: PathBuf::from("client-config.json"),
            admin_key: None,
            request_timeout_secs: 30,
            max_body_bytes: 256 * 1024,
            metrics_address: None,
        }
    }
}

/// Invalid server environment.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{var} has invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build settings from an arbitrary variable lookup. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = parse_var(get("PORT"), "PORT")?.unwrap_or(8000);

        Ok(Self {
            bind_address: format!("{}:{}", host, port),
            document_path: get("CLIENT_CONFIG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.document_path),
            admin_key: get(ADMIN_KEY_ENV_VAR),
            request_timeout_secs: parse_var(get("REQUEST_TIMEOUT_SECS"), "REQUEST_TIMEOUT_SECS")?
                .unwrap_or(defaults.request_timeout_secs),
            max_body_bytes: parse_var(get("MAX_BODY_BYTES"), "MAX_BODY_BYTES")?
                .unwrap_or(defaults.max_body_bytes),
            metrics_address: parse_var(get("METRICS_ADDR"), "METRICS_ADDR")?,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    value: Option<String>,
    var: &'static str,
) -> Result<Option<T>, SettingsError> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| SettingsError::Invalid { var, value: raw }),
    }
}
