//! Configuration loading
//!
//! Settings come from `~/.config/wastedge-cli/config.toml` (or an explicit
//! path), then `WASTEDGE_*` environment variables override the connection.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::{Credentials, RetryConfig};

pub const ENV_URL: &str = "WASTEDGE_URL";
pub const ENV_COMPANY: &str = "WASTEDGE_COMPANY";
pub const ENV_USER: &str = "WASTEDGE_USER";
pub const ENV_PASSWORD: &str = "WASTEDGE_PASSWORD";

/// Connection settings for one installation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub url: Option<String>,
    pub company: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub retry: RetryConfig,
}

impl Config {
    /// Load from `path`, or from the default location when it exists.
    ///
    /// A missing default file is not an error; a missing explicit file is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Override connection settings from the environment
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let conn = &mut self.connection;
        for (key, slot) in [
            (ENV_URL, &mut conn.url),
            (ENV_COMPANY, &mut conn.company),
            (ENV_USER, &mut conn.user),
            (ENV_PASSWORD, &mut conn.password),
        ] {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *slot = Some(value);
            }
        }
    }

    pub fn credentials(&self) -> Result<Credentials> {
        let conn = &self.connection;
        let url = conn
            .url
            .clone()
            .with_context(|| format!("No API URL configured (set {} or [connection].url)", ENV_URL))?;
        let company = conn.company.clone().with_context(|| {
            format!("No company configured (set {} or [connection].company)", ENV_COMPANY)
        })?;
        let user = conn
            .user
            .clone()
            .with_context(|| format!("No user configured (set {} or [connection].user)", ENV_USER))?;
        let password = conn.password.clone().unwrap_or_default();

        Credentials::new(url, company, user, password).context("Invalid connection settings")
    }
}

/// `~/.config/wastedge-cli/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("wastedge-cli").join("config.toml"))
}
