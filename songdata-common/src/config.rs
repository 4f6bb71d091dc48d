//! Configuration loading and config file resolution
//!
//! Configuration file location, in priority order:
//! 1. `SONGDATA_CONFIG` environment variable
//! 2. `<user config dir>/songdata/config.toml`
//!
//! A missing file is not an error: every section has built-in defaults.
//! A file that exists but cannot be read or parsed is reported as
//! [`Error::Config`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SONGDATA_CONFIG";

const CONFIG_DIR_NAME: &str = "songdata";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Metadata provider connection settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Delays inserted before provider calls
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Output table locations
    #[serde(default)]
    pub output: OutputConfig,

    /// Artists to collect (built-in list when absent)
    #[serde(default)]
    pub artists: Option<Vec<String>>,

    /// Feature names to average (built-in allow-list when absent)
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Provider (Spotify Web API) connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Client-credentials id (overridden by `SONGDATA_CLIENT_ID`)
    #[serde(default)]
    pub client_id: Option<String>,

    /// Client-credentials secret (overridden by `SONGDATA_CLIENT_SECRET`)
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Market used for top-tracks requests
    #[serde(default = "default_market")]
    pub market: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_accounts_url")]
    pub accounts_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Token-bucket limit applied to every HTTP request
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            market: default_market(),
            api_base_url: default_api_base_url(),
            accounts_url: default_accounts_url(),
            timeout_secs: default_timeout_secs(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

/// Fixed pacing intervals in milliseconds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PacingConfig {
    /// Pause before each top-tracks request
    #[serde(default = "default_top_tracks_ms")]
    pub top_tracks_ms: u64,

    /// Pause before each audio-features request
    #[serde(default = "default_features_ms")]
    pub features_ms: u64,

    /// Pause before each track is aggregated
    #[serde(default = "default_aggregation_step_ms")]
    pub aggregation_step_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            top_tracks_ms: default_top_tracks_ms(),
            features_ms: default_features_ms(),
            aggregation_step_ms: default_aggregation_step_ms(),
        }
    }
}

/// Output table locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory both tables are written into
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    /// Per-artist averages table
    #[serde(default = "default_averages_file")]
    pub averages_file: String,

    /// Per-track table
    #[serde(default = "default_tracks_file")]
    pub tracks_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            averages_file: default_averages_file(),
            tracks_file: default_tracks_file(),
        }
    }
}

impl OutputConfig {
    pub fn averages_path(&self) -> PathBuf {
        self.directory.join(&self.averages_file)
    }

    pub fn tracks_path(&self) -> PathBuf {
        self.directory.join(&self.tracks_file)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_market() -> String {
    "US".to_string()
}

fn default_api_base_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_accounts_url() -> String {
    "https://accounts.spotify.com/api/token".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_requests_per_second() -> u32 {
    5
}

fn default_top_tracks_ms() -> u64 {
    10_000
}

fn default_features_ms() -> u64 {
    10_000
}

fn default_aggregation_step_ms() -> u64 {
    5_000
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_averages_file() -> String {
    "artists_average.csv".to_string()
}

fn default_tracks_file() -> String {
    "all_tracks.csv".to_string()
}

impl TomlConfig {
    /// Parse configuration from a TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Locate the config file, if any
///
/// An explicit `SONGDATA_CONFIG` path is returned even when it does not
/// exist so that the caller can report it; the default location is only
/// returned when present.
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir()
        .map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .filter(|p| p.exists())
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// Explicitly named file does not exist; defaults used
    Missing(PathBuf),
    /// No file found; defaults used
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Missing(path) => {
                write!(f, "built-in defaults ({} not found)", path.display())
            }
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// Load configuration with graceful degradation
///
/// Missing config file → defaults. Unreadable or malformed file → error.
///
/// Nothing is logged here: this runs before the tracing subscriber exists,
/// so the caller logs the returned [`ConfigSource`] once logging is up.
pub fn load_config() -> Result<(TomlConfig, ConfigSource)> {
    match config_file_path() {
        Some(path) if path.exists() => {
            let config = TomlConfig::load_from(&path)?;
            Ok((config, ConfigSource::File(path)))
        }
        Some(path) => Ok((TomlConfig::default(), ConfigSource::Missing(path))),
        None => Ok((TomlConfig::default(), ConfigSource::Defaults)),
    }
}
