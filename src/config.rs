//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub access: AccessConfig,

    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub records: RecordsConfig,

    #[serde(default)]
    pub settings: SettingsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Recognition API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Unset means no timeout beyond the transport default
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_url() -> String {
    "http://localhost:8080/FaceCheckInFunction".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            request_timeout_secs: None,
        }
    }
}

/// Passkey allow-list gating registration and the admin view
#[derive(Debug, Clone, Deserialize)]
pub struct AccessConfig {
    #[serde(default = "default_passkeys")]
    pub passkeys: Vec<String>,
}

fn default_passkeys() -> Vec<String> {
    vec!["2011".to_string()]
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            passkeys: default_passkeys(),
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    /// Image file kept current by the capture daemon
    #[serde(default = "default_camera_device")]
    pub device: String,

    #[serde(default = "default_ideal_width")]
    pub ideal_width: u32,

    #[serde(default = "default_ideal_height")]
    pub ideal_height: u32,

    /// Minimum base64 payload length accepted as a capture
    #[serde(default = "default_min_image_size")]
    pub min_image_size: usize,
}

fn default_camera_device() -> String {
    "/run/facecheck/frame.jpg".to_string()
}

fn default_ideal_width() -> u32 {
    640
}

fn default_ideal_height() -> u32 {
    480
}

fn default_min_image_size() -> usize {
    1000
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: default_camera_device(),
            ideal_width: default_ideal_width(),
            ideal_height: default_ideal_height(),
            min_image_size: default_min_image_size(),
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Offset of the display time zone from UTC, in minutes (Asia/Kolkata)
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,
}

fn default_utc_offset() -> i32 {
    330
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: default_utc_offset(),
        }
    }
}

impl DisplayConfig {
    /// The display zone, falling back to UTC for out-of-range offsets
    pub fn zone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }
}

/// Record view configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RecordsConfig {
    /// Show synthetic records when a query fails
    #[serde(default = "default_demo_fallback")]
    pub demo_fallback: bool,

    #[serde(default = "default_working_days")]
    pub working_days_per_month: u32,

    #[serde(default = "default_export_dir")]
    pub export_dir: String,
}

fn default_demo_fallback() -> bool {
    true
}

fn default_working_days() -> u32 {
    22
}

fn default_export_dir() -> String {
    dirs::download_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string())
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            demo_fallback: default_demo_fallback(),
            working_days_per_month: default_working_days(),
            export_dir: default_export_dir(),
        }
    }
}

/// Preference store location
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsConfig {
    #[serde(default = "default_preferences_path")]
    pub path: String,
}

fn default_preferences_path() -> String {
    dirs::config_dir()
        .map(|p| {
            p.join("facecheck")
                .join("preferences.toml")
                .to_string_lossy()
                .to_string()
        })
        .unwrap_or_else(|| "./preferences.toml".to_string())
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            path: default_preferences_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("facecheck").join("config.toml")),
            Some(PathBuf::from("/etc/facecheck/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("FACECHECK_API_URL") {
            self.api.url = url;
        }
        if let Ok(device) = std::env::var("FACECHECK_CAMERA_DEVICE") {
            self.camera.device = device;
        }
        if let Ok(dir) = std::env::var("FACECHECK_EXPORT_DIR") {
            self.records.export_dir = dir;
        }
        if let Ok(level) = std::env::var("FACECHECK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FACECHECK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# FaceCheck Kiosk Configuration
#
# Environment variables override these settings:
# - FACECHECK_API_URL
# - FACECHECK_CAMERA_DEVICE
# - FACECHECK_EXPORT_DIR
# - FACECHECK_LOG_LEVEL
# - FACECHECK_LOG_FORMAT

[api]
# Recognition endpoint (single POST URL)
url = "http://localhost:8080/FaceCheckInFunction"

# Request timeout in seconds (omit for no timeout)
# request_timeout_secs = 30

[access]
# Passkeys accepted for registration and the admin records view
passkeys = ["2011"]

[camera]
# Image file the capture daemon keeps current
device = "/run/facecheck/frame.jpg"

# Requested resolution
ideal_width = 640
ideal_height = 480

# Captures with a shorter base64 payload are rejected
min_image_size = 1000

[display]
# Display time zone offset from UTC in minutes (330 = Asia/Kolkata)
utc_offset_minutes = 330

[records]
# Show demo records when a records query fails
demo_fallback = true

# Working days per month used for the attendance rate
working_days_per_month = 22

# Where exported CSV files are written
export_dir = "."

[settings]
# Preference store
# path = "~/.config/facecheck/preferences.toml"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
