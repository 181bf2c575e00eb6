//! Client Configuration
//!
//! Environment-driven configuration for the WorkPulse client.
//! The binary loads a `.env` file first, so every value here can come
//! from either the process environment or that file.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Backend base URL environment variable
pub const ENV_API_URL: &str = "WORKPULSE_API_URL";
/// Request timeout (seconds) environment variable
pub const ENV_TIMEOUT_SECS: &str = "WORKPULSE_TIMEOUT_SECS";
/// Directory holding durable session material
pub const ENV_STATE_DIR: &str = "WORKPULSE_STATE_DIR";
/// Companion process address (`host:port`); unset disables the bridge
pub const ENV_COMPANION_ADDR: &str = "WORKPULSE_COMPANION_ADDR";

const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STATE_DIR: &str = ".workpulse";
const SESSION_FILE_NAME: &str = "session.json";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be an http(s) URL (got {value:?})")]
    InvalidUrl { var: &'static str, value: String },

    #[error("{var} must be a positive integer (got {value:?})")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must be a socket address like 127.0.0.1:47615 (got {value:?})")]
    InvalidAddress { var: &'static str, value: String },
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL without trailing slash (e.g. `https://host/api/v1`)
    pub api_base_url: String,
    /// Per-request timeout enforced by the transport
    pub request_timeout: Duration,
    /// Directory for durable storage
    pub state_dir: PathBuf,
    /// Companion process address, if any
    pub companion_addr: Option<SocketAddr>,
    /// User-Agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            companion_addr: None,
            user_agent: format!("workpulse-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.api_base_url = normalize_base_url(&url)?;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidNumber {
                    var: ENV_TIMEOUT_SECS,
                    value: raw.clone(),
                })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(dir) = lookup(ENV_STATE_DIR).filter(|d| !d.trim().is_empty()) {
            config.state_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(ENV_COMPANION_ADDR).filter(|a| !a.trim().is_empty()) {
            let addr = raw
                .trim()
                .parse::<SocketAddr>()
                .map_err(|_| ConfigError::InvalidAddress {
                    var: ENV_COMPANION_ADDR,
                    value: raw.clone(),
                })?;
            config.companion_addr = Some(addr);
        }

        Ok(config)
    }

    /// Configuration for local development against a backend on localhost
    pub fn development() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            ..Self::default()
        }
    }

    /// Path of the durable session document
    pub fn session_file(&self) -> PathBuf {
        self.state_dir.join(SESSION_FILE_NAME)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let valid = (trimmed.starts_with("http://") || trimmed.starts_with("https://"))
        && trimmed.len() > "https://".len();
    if !valid {
        return Err(ConfigError::InvalidUrl {
            var: ENV_API_URL,
            value: raw.to_string(),
        });
    }
    Ok(trimmed.to_string())
}
