//! Configuration loading for the dashboard client
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`EEGDASH_API_URL`)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or malformed TOML file never aborts startup. It is logged and the
//! compiled defaults are used instead.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Environment variable naming the API base URL
pub const API_URL_ENV: &str = "EEGDASH_API_URL";

/// Loopback address used when nothing else configures the API
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Dashboard auto-refresh period
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// TOML configuration file contents
///
/// Every field is optional so a partial file only overrides what it names.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// API base URL, e.g. `https://eeg.example.org/api`
    #[serde(default)]
    pub api_url: Option<String>,

    /// Path of the JSON file holding the persisted session
    #[serde(default)]
    pub state_file: Option<PathBuf>,

    /// Dashboard refresh period in seconds
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }
}

/// Built-in values used when no other source configures a setting
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub api_url: String,
    pub state_file: PathBuf,
    pub poll_interval: Duration,
    pub log_level: String,
}

impl CompiledDefaults {
    /// Defaults for the platform this binary was built for
    pub fn for_current_platform() -> Self {
        // ~/.local/share/eegdash on Linux, ~/Library/Application Support/eegdash
        // on macOS, %LOCALAPPDATA%\eegdash on Windows
        let state_dir = dirs::data_local_dir()
            .map(|d| d.join("eegdash"))
            .unwrap_or_else(|| PathBuf::from("./eegdash_data"));

        Self {
            api_url: DEFAULT_API_URL.to_string(),
            state_file: state_dir.join("state.json"),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            log_level: default_log_level(),
        }
    }
}

/// Fully resolved client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL without a trailing slash
    pub api_url: String,
    /// Durable session state file
    pub state_file: PathBuf,
    /// Dashboard refresh period
    pub poll_interval: Duration,
    /// Default log level when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let defaults = CompiledDefaults::for_current_platform();
        Self {
            api_url: defaults.api_url,
            state_file: defaults.state_file,
            poll_interval: defaults.poll_interval,
            log_level: defaults.log_level,
        }
    }
}

/// Resolves [`ClientConfig`] from all configuration tiers
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_api_url: Option<String>,
    config_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// API URL given on the command line
    pub fn with_cli_api_url(mut self, url: Option<String>) -> Self {
        self.cli_api_url = url;
        self
    }

    /// Explicit config file instead of the platform default location
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Resolve configuration. Never fails: broken sources fall through to
    /// the next tier.
    pub fn resolve(&self) -> ClientConfig {
        let defaults = CompiledDefaults::for_current_platform();
        let toml_config = self.load_toml().unwrap_or_default();

        let api_url = if let Some(url) = self.cli_api_url.as_deref().filter(|u| is_usable(u)) {
            debug!("API URL from command line");
            url.to_string()
        } else if let Some(url) = std::env::var(API_URL_ENV).ok().filter(|u| is_usable(u)) {
            debug!("API URL from {}", API_URL_ENV);
            url
        } else if let Some(url) = toml_config.api_url.clone().filter(|u| is_usable(u)) {
            debug!("API URL from TOML config");
            url
        } else {
            defaults.api_url
        };

        ClientConfig {
            api_url: normalize_base_url(&api_url),
            state_file: toml_config.state_file.unwrap_or(defaults.state_file),
            poll_interval: toml_config
                .poll_interval_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            log_level: toml_config.logging.level,
        }
    }

    fn load_toml(&self) -> Option<TomlConfig> {
        let path = match &self.config_path {
            Some(path) => path.clone(),
            None => default_config_path()?,
        };

        if !path.exists() {
            if self.config_path.is_some() {
                warn!("Config file not found: {} (using defaults)", path.display());
            }
            return None;
        }

        match TomlConfig::load(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                warn!("{} (using defaults)", e);
                None
            }
        }
    }
}

/// `~/.config/eegdash/config.toml` (platform equivalent elsewhere)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("eegdash").join("config.toml"))
}

fn is_usable(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Trim whitespace and trailing slashes so paths can be appended directly
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
