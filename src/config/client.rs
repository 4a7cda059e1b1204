//! Desk client settings.

use std::path::PathBuf;
use std::time::Duration;

/// Directory name under the per-user data directory.
pub const APP_DIR_NAME: &str = "movidesk";

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(8);
pub const PUBLISH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the client keeps its files and which server it talks to.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Local configuration document.
    pub config_path: PathBuf,

    /// Last fetched server document.
    pub cache_path: PathBuf,

    /// Full URL of the `/client-config` endpoint.
    pub remote_url: Option<String>,

    /// Token from the environment, preferred over the stored one.
    pub token_override: Option<String>,

    pub fetch_timeout: Duration,
    pub publish_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        let dir = app_data_dir();
        Self {
            config_path: dir.join("config.json"),
            cache_path: dir.join("remote-config.json"),
            remote_url: None,
            token_override: None,
            fetch_timeout: FETCH_TIMEOUT,
            publish_timeout: PUBLISH_TIMEOUT,
        }
    }
}

impl ClientSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            config_path: get("MOVIDESK_CONFIG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.config_path),
            cache_path: get("MOVIDESK_CACHE_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_path),
            remote_url: get("MOVIDESK_CONFIG_URL"),
            token_override: get("MOVIDESK_TOKEN"),
            ..defaults
        }
    }
}

/// Per-user application data directory, falling back to the working
/// directory on platforms without one.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}
