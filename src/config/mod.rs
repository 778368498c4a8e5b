//! Configuration management for the `SummerFinder` application
//!
//! Two layers live here:
//! - [`Settings`]: ambient settings (service endpoints, timeouts, retry policy,
//!   logging) loaded from an optional TOML file plus `SUMMERFINDER__*` environment
//!   variables.
//! - [`HomeConfig`]: the user's `config.json` with the home location and phone
//!   number used by the search front ends.

pub mod home;

pub use home::{DEFAULT_CONFIG_FILE, HomeConfig, resolve_home};

use std::path::PathBuf;

use clap::ValueEnum;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{Result, SummerFinderError};

/// Default settings file looked up in the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "summerfinder.toml";

/// Root settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Forecast and geocoding service settings
    pub weather: WeatherSettings,
    /// SMS gateway settings
    pub notifier: NotifierSettings,
    /// Elevation service settings
    pub elevation: ElevationSettings,
    /// HTTP front end settings
    pub server: ServerSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// How the weather client reacts to failed requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum RetryMode {
    /// One attempt; the caller skips the campground on failure
    FailFast,
    /// Bounded exponential backoff on transient failures
    #[default]
    Backoff,
    /// Retry timeouts indefinitely
    UntilSuccess,
}

/// Forecast service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    /// Base URL of the forecast API
    pub base_url: String,
    /// Base URL of the geocoding API
    pub geocoding_base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Retry policy for forecast requests
    pub retry: RetryMode,
    /// Maximum retries when `retry = "backoff"`
    pub max_retries: u32,
}

/// SMS gateway settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierSettings {
    pub endpoint: String,
    pub api_key: String,
}

/// Elevation service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationSettings {
    pub base_url: String,
}

/// HTTP front end settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
    /// Campground list searched by the streaming endpoint
    pub campgrounds_file: String,
    /// Home/phone configuration file
    pub config_file: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or compact)
    pub format: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u64 {
    10
}

fn default_weather_max_retries() -> u32 {
    3
}

fn default_notifier_endpoint() -> String {
    "https://textbelt.com/text".to_string()
}

fn default_notifier_key() -> String {
    "textbelt".to_string()
}

fn default_elevation_base_url() -> String {
    "https://api.open-elevation.com/api/v1".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            geocoding_base_url: default_geocoding_base_url(),
            timeout_seconds: default_weather_timeout(),
            retry: RetryMode::default(),
            max_retries: default_weather_max_retries(),
        }
    }
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            endpoint: default_notifier_endpoint(),
            api_key: default_notifier_key(),
        }
    }
}

impl Default for ElevationSettings {
    fn default() -> Self {
        Self {
            base_url: default_elevation_base_url(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 5000,
            campgrounds_file: crate::campgrounds::DEFAULT_CAMPGROUNDS_FILE.to_string(),
            config_file: DEFAULT_CONFIG_FILE.to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from the default file (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load settings from the given file (if present) and the environment
    pub fn load_from_path(settings_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let settings_file = settings_path.unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));

        if settings_file.exists() {
            builder = builder.add_source(
                File::from(settings_file.clone())
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. SUMMERFINDER__WEATHER__TIMEOUT_SECONDS=20
        builder = builder.add_source(
            Environment::with_prefix("SUMMERFINDER")
                .separator("__")
                .try_parsing(true),
        );

        let built = builder.build().map_err(|e| {
            SummerFinderError::config(format!("Failed to build settings: {e}"))
        })?;

        let mut settings: Settings = built.try_deserialize().map_err(|e| {
            SummerFinderError::config(format!("Failed to deserialize settings: {e}"))
        })?;

        settings.apply_defaults();
        settings.validate()?;

        Ok(settings)
    }

    /// Replace empty values with defaults
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.geocoding_base_url.is_empty() {
            self.weather.geocoding_base_url = default_geocoding_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.notifier.endpoint.is_empty() {
            self.notifier.endpoint = default_notifier_endpoint();
        }
        if self.notifier.api_key.is_empty() {
            self.notifier.api_key = default_notifier_key();
        }
        if self.elevation.base_url.is_empty() {
            self.elevation.base_url = default_elevation_base_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(SummerFinderError::config(
                "Weather API timeout cannot exceed 300 seconds",
            ));
        }

        if self.weather.max_retries > 10 {
            return Err(SummerFinderError::config(
                "Weather API max retries cannot exceed 10",
            ));
        }

        if self.server.port == 0 {
            return Err(SummerFinderError::config("Server port cannot be 0"));
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SummerFinderError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "compact"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SummerFinderError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        let urls = [
            ("Weather API base URL", &self.weather.base_url),
            ("Geocoding API base URL", &self.weather.geocoding_base_url),
            ("Notifier endpoint", &self.notifier.endpoint),
            ("Elevation API base URL", &self.elevation.base_url),
        ];
        for (label, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SummerFinderError::config(format!(
                    "{label} must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.weather.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(settings.weather.timeout_seconds, 10);
        assert_eq!(settings.weather.retry, RetryMode::Backoff);
        assert_eq!(settings.notifier.endpoint, "https://textbelt.com/text");
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.server.campgrounds_file, "all-campgrounds.json");
        assert_eq!(settings.logging.level, "info");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        write!(
            file,
            "[weather]\ntimeout_seconds = 20\nretry = \"until_success\"\n\n[server]\nport = 8080\n"
        )
        .unwrap();

        let settings = Settings::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(settings.weather.timeout_seconds, 20);
        assert_eq!(settings.weather.retry, RetryMode::UntilSuccess);
        assert_eq!(settings.server.port, 8080);
        // untouched sections keep their defaults
        assert_eq!(settings.notifier.api_key, "textbelt");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings =
            Settings::load_from_path(Some(PathBuf::from("/no/such/summerfinder.toml"))).unwrap();
        assert_eq!(settings.weather.max_retries, 3);
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "loud".to_string();
        let result = settings.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_validation_numeric_ranges() {
        let mut settings = Settings::default();
        settings.weather.timeout_seconds = 500;
        let result = settings.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_validation_rejects_non_http_url() {
        let mut settings = Settings::default();
        settings.notifier.endpoint = "ftp://textbelt.com".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut settings = Settings::default();
        settings.weather.base_url.clear();
        settings.logging.format.clear();
        settings.apply_defaults();
        assert_eq!(settings.weather.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(settings.logging.format, "pretty");
    }

    #[test]
    fn test_retry_mode_parsing() {
        let parse = |s: &str| RetryMode::from_str(s, false);
        assert_eq!(parse("fail_fast"), Ok(RetryMode::FailFast));
        assert_eq!(parse("backoff"), Ok(RetryMode::Backoff));
        assert_eq!(parse("until_success"), Ok(RetryMode::UntilSuccess));
        assert!(parse("sometimes").is_err());
        assert_eq!(
            RetryMode::UntilSuccess
                .to_possible_value()
                .map(|value| value.get_name().to_string()),
            Some("until_success".to_string())
        );
    }
}
