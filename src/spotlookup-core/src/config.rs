use crate::paths::AppDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const CURRENT_CONFIG_VERSION: u32 = 1;

/// Bitrates the streaming backends can be asked for.
pub const SUPPORTED_BITRATES: [u32; 3] = [96, 160, 320];

pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_config_version")]
    pub config_version: u32,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub web_api: WebApiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            logging: LoggingConfig::default(),
            lookup: LookupConfig::default(),
            web_api: WebApiConfig::default(),
        }
    }
}

/// Settings that shape every lookup call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Tagged onto every produced track.
    #[serde(default = "default_bitrate")]
    pub bitrate: u32,
    /// Upper bound for blocking loads against the native session.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            bitrate: default_bitrate(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub access_token: Option<String>,
    /// Account whose playlists are listed.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Default for WebApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            access_token: None,
            user_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default = "default_stdout_enabled")]
    pub stdout: bool,
    /// Write a daily-rolling log file under the log directory.
    #[serde(default)]
    pub file: bool,
    #[serde(default = "default_max_log_files")]
    pub max_log_files: usize,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            stdout: default_stdout_enabled(),
            file: false,
            max_log_files: default_max_log_files(),
            file_name: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("config validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("failed to prepare configuration directories: {0}")]
    Directories(#[from] crate::paths::DirsError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unsupported config_version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("unsupported bitrate {0}, expected one of 96, 160, 320")]
    UnsupportedBitrate(u32),
    #[error("lookup.timeout_seconds must be greater than zero")]
    ZeroTimeout,
    #[error("invalid web_api.base_url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl Config {
    pub fn load_or_default(dirs: &AppDirs) -> Result<Self, ConfigError> {
        dirs.ensure_exists()?;
        Self::load_from(&Self::config_path(dirs))
    }

    /// Load and validate a config file, falling back to defaults when it is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn config_path(dirs: &AppDirs) -> PathBuf {
        dirs.config_dir().join("config.toml")
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.config_version != CURRENT_CONFIG_VERSION {
            return Err(ValidationError::UnsupportedVersion {
                found: self.config_version,
                expected: CURRENT_CONFIG_VERSION,
            });
        }
        if !SUPPORTED_BITRATES.contains(&self.lookup.bitrate) {
            return Err(ValidationError::UnsupportedBitrate(self.lookup.bitrate));
        }
        if self.lookup.timeout_seconds == 0 {
            return Err(ValidationError::ZeroTimeout);
        }
        url::Url::parse(&self.web_api.base_url).map_err(|e| ValidationError::InvalidBaseUrl {
            url: self.web_api.base_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Apply `SPOTIFY_ACCESS_TOKEN` / `SPOTIFY_USER_ID` style overrides.
    pub fn with_overrides(mut self, access_token: Option<String>, user_id: Option<String>) -> Self {
        if let Some(token) = access_token.filter(|t| !t.is_empty()) {
            self.web_api.access_token = Some(token);
        }
        if let Some(user) = user_id.filter(|u| !u.is_empty()) {
            self.web_api.user_id = Some(user);
        }
        self
    }
}

fn default_config_version() -> u32 {
    CURRENT_CONFIG_VERSION
}

fn default_bitrate() -> u32 {
    160
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_max_log_files() -> usize {
    7
}

fn default_stdout_enabled() -> bool {
    true
}
