//! Configuration management for cdash.
//!
//! Loads configuration from ${CDASH_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default config template with comments, embedded at compile time.
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../default_config.toml");

/// Environment variable that overrides `api_base_url`.
pub const API_URL_ENV: &str = "CDASH_API_URL";

pub mod paths {
    //! Path resolution for cdash configuration and data directories.
    //!
    //! CDASH_HOME resolution order:
    //! 1. CDASH_HOME environment variable (if set)
    //! 2. ~/.config/cdash (default)

    use std::path::PathBuf;

    /// Returns the cdash home directory.
    ///
    /// Checks CDASH_HOME env var first, falls back to ~/.config/cdash.
    /// Falls back to a relative `.cdash` directory when no home directory exists.
    pub fn cdash_home() -> PathBuf {
        if let Ok(home) = std::env::var("CDASH_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".cdash"),
            |h| h.join(".config").join("cdash"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        cdash_home().join("config.toml")
    }

    /// Returns the path to the persisted credential token.
    pub fn token_path() -> PathBuf {
        cdash_home().join("token")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the remote API (no trailing slash needed)
    pub api_base_url: String,

    /// Timeout for each API request in seconds (0 disables)
    pub request_timeout_secs: u32,
}

impl Config {
    pub const DEFAULT_API_BASE_URL: &str = "https://creator-dashboard-360o.onrender.com/api";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 30;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the API base URL to use, preferring `CDASH_API_URL` when set.
    /// Empty strings are treated as unset. Trailing slashes are stripped.
    pub fn effective_api_base_url(&self) -> String {
        let from_env = std::env::var(API_URL_ENV).ok();
        Self::resolve_base_url(from_env.as_deref(), &self.api_base_url)
    }

    fn resolve_base_url(env_value: Option<&str>, configured: &str) -> String {
        let chosen = env_value
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| configured.trim());
        let chosen = if chosen.is_empty() {
            Self::DEFAULT_API_BASE_URL
        } else {
            chosen
        };
        chosen.trim_end_matches('/').to_string()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Saves only the `api_base_url` field to the default config file.
    pub fn save_api_base_url(url: &str) -> Result<()> {
        Self::save_api_base_url_to(&paths::config_path(), url)
    }

    /// Saves only the `api_base_url` field to a specific config file path.
    ///
    /// Creates the file with default template if it doesn't exist.
    /// Preserves existing fields and comments using `toml_edit`.
    pub fn save_api_base_url_to(path: &Path, url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let parsed = url::Url::parse(url).with_context(|| format!("Invalid API URL: {url}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("API URL must use http or https, got '{}'", parsed.scheme());
        }

        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            DEFAULT_CONFIG_TEMPLATE.to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["api_base_url"] = value(url.trim_end_matches('/'));

        Self::write_config(path, &doc.to_string())
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, DEFAULT_CONFIG_TEMPLATE)
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}
