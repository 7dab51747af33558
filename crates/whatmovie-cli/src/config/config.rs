//! `AppConfig` struct and TOML loading.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

/// Environment variable that overrides `kofic.api_key`.
pub const API_KEY_ENV: &str = "KOFIC_API_KEY";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// KOFIC API settings.
    #[serde(default)]
    pub kofic: KoficConfig,
}

/// KOFIC API configuration.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct KoficConfig {
    /// API key issued by KOBIS. `KOFIC_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Override for the REST API base URL (a missing trailing `/` is added).
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Override for the web site base URL (HTML pages).
    #[serde(default)]
    pub web_base_url: Option<Url>,
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for KoficConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: None,
            web_base_url: None,
        }
    }
}

impl KoficConfig {
    /// Request timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolves the API key, preferring `env_key` (the value of
    /// `KOFIC_API_KEY`) over the config file. Blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if neither source provides a key.
    pub fn resolve_api_key(&self, env_key: Option<String>) -> Result<String> {
        env_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .with_context(|| {
                format!("{API_KEY_ENV} environment variable or kofic.api_key in config is required")
            })
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}
