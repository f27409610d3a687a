//! Application configuration loaded from `~/.config/steamdash/config.toml`
//! with `STEAMDASH__*` environment overrides.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::session::store::CredentialStore;

/// Directory under the user config dir holding all steamdash files.
pub const APP_DIR: &str = "steamdash";
/// File name of the TOML configuration.
pub const CONFIG_FILE: &str = "config.toml";
/// Default tracker API endpoint.
pub const DEFAULT_BASE_URL: &str = "http://43.203.124.85:8080";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

const ENV_PREFIX: &str = "STEAMDASH";

const DEFAULT_CONFIG: &str = r##"# steamdash configuration
start_route = "/"

[api]
base_url = "http://43.203.124.85:8080"
timeout_secs = 15

[session]
# credential_path = "/path/to/credential.json"

[theme]
# accent = "#3B82F6"
"##;

/// Top level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Route opened when the dashboard starts.
    #[serde(default = "default_start_route")]
    pub start_route: String,
    /// Tracker API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Session storage settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Optional colour overrides.
    #[serde(default)]
    pub theme: ThemeConfig,
}

/// Tracker API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Where the login credential is kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Explicit credential file; defaults to the config directory.
    #[serde(default)]
    pub credential_path: Option<PathBuf>,
}

/// Hex colour overrides for the terminal palette.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Accent colour used for titles and selection markers.
    #[serde(default)]
    pub accent: Option<String>,
    /// Colour used for discounts and reached targets.
    #[serde(default)]
    pub success: Option<String>,
    /// Colour used for errors.
    #[serde(default)]
    pub danger: Option<String>,
}

fn default_start_route() -> String {
    "/".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            start_route: default_start_route(),
            api: ApiConfig::default(),
            session: SessionConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl AppConfig {
    /// Load configuration from the default location plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from `path` (optional) plus environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .set_default("start_route", default_start_route())?
            .set_default("api.base_url", default_base_url())?
            .set_default("api.timeout_secs", default_timeout_secs())?
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;

        let config: AppConfig = settings
            .try_deserialize()
            .with_context(|| format!("failed to parse configuration {}", path.display()))?;
        Ok(config)
    }

    /// Path of the persisted login credential.
    pub fn credential_path(&self) -> PathBuf {
        self.session
            .credential_path
            .clone()
            .unwrap_or_else(CredentialStore::default_path)
    }
}

/// Directory holding configuration and session files.
pub fn app_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Default configuration file location.
pub fn config_path() -> PathBuf {
    app_dir().join(CONFIG_FILE)
}

/// Write the default configuration file when none exists yet.
pub fn ensure_default_config() -> Result<()> {
    ensure_default_config_at(config_path())
}

/// Write the default configuration to `path` when it is missing.
pub fn ensure_default_config_at(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(())
}
