use crate::api::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};

/// Environment variable selecting the backend base URL.
pub const API_URL_ENV: &str = "CHURN_API_URL";

/// Client configuration (`config.toml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend origin every endpoint path is appended to.
    pub api_url: String,
    /// Token file location. `~` and `$VARS` are expanded. Defaults to
    /// `session_token` in the platform data directory.
    pub session_file: Option<String>,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Default log filter when `RUST_LOG` is unset (e.g. "info", "churnctl=debug").
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: None,
        }
    }
}
