//! Configuration loading.
//!
//! Precedence, lowest to highest: built-in defaults, `config.toml`, the
//! `CHURN_API_URL` environment variable, command-line flags.

pub mod schema;

pub use schema::{Config, API_URL_ENV};

use crate::auth::TOKEN_FILE_NAME;
use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "config.toml";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("live", "telcopredict", "churnctl")
}

/// Default location of `config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing file at the default location yields defaults; a missing
    /// file that was named explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (Some(p.to_path_buf()), true),
            None => (default_config_path(), false),
        };

        let Some(path) = path else {
            tracing::debug!("No config directory available, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            if explicit {
                bail!("Config file not found: {}", path.display());
            }
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides from an arbitrary lookup.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!("{API_URL_ENV} set, overriding api_url");
            self.api_url = url.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.api_url.trim();
        if url.is_empty() {
            bail!("api_url cannot be empty");
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("api_url must start with http:// or https:// (got '{url}')");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolved path of the session token file.
    pub fn session_path(&self) -> Result<PathBuf> {
        if let Some(raw) = self.session_file.as_deref().filter(|s| !s.trim().is_empty()) {
            let expanded = shellexpand::full(raw.trim())
                .with_context(|| format!("Failed to expand session_file '{raw}'"))?;
            return Ok(PathBuf::from(expanded.as_ref()));
        }
        let dirs = project_dirs()
            .context("Could not determine a data directory; set session_file in config.toml")?;
        Ok(dirs.data_dir().join(TOKEN_FILE_NAME))
    }
}
