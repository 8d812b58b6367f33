//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/uploadpulse/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/uploadpulse/` (~/.config/uploadpulse/)
//! - State/Logs: `$XDG_STATE_HOME/uploadpulse/` (~/.local/state/uploadpulse/)

use crate::analytics::{Granularity, LevelThresholds};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Report defaults
    #[serde(default)]
    pub report: ReportConfig,

    /// Calendar heatmap configuration
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Time zone used to assign uploads to calendar days and hours
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneChoice {
    /// The host's local time zone
    #[default]
    Local,
    /// Coordinated Universal Time
    Utc,
}

/// Report defaults
#[derive(Debug, Deserialize)]
pub struct ReportConfig {
    /// Period shown when none is requested
    #[serde(default)]
    pub default_period: Granularity,

    /// Time zone for day and hour bucketing
    #[serde(default)]
    pub timezone: TimeZoneChoice,

    /// Number of file types listed in reports
    #[serde(default = "default_top_file_types")]
    pub top_file_types: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_period: Granularity::default(),
            timezone: TimeZoneChoice::default(),
            top_file_types: default_top_file_types(),
        }
    }
}

fn default_top_file_types() -> usize {
    5
}

/// Calendar heatmap configuration
#[derive(Debug, Deserialize, Default)]
pub struct CalendarConfig {
    /// Minimum counts for the four non-empty heatmap levels
    #[serde(default)]
    pub levels: LevelThresholds,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration, returning an error for unusable values
    pub fn validate(&self) -> Result<()> {
        self.calendar.levels.validate()?;
        if self.report.top_file_types == 0 {
            return Err(Error::Config(
                "report.top_file_types must be at least 1".to_string(),
            ));
        }
        if self.logging.max_files == 0 {
            return Err(Error::Config(
                "logging.max_files must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/uploadpulse/config.toml` (~/.config/uploadpulse/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("uploadpulse").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/uploadpulse/` (~/.local/state/uploadpulse/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("uploadpulse")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/uploadpulse/uploadpulse.log` (~/.local/state/uploadpulse/uploadpulse.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("uploadpulse.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.report.default_period, Granularity::Month);
        assert_eq!(config.report.timezone, TimeZoneChoice::Local);
        assert_eq!(config.report.top_file_types, 5);
        assert_eq!(config.calendar.levels, LevelThresholds([1, 2, 4, 7]));
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[report]
default_period = "week"
timezone = "utc"

[calendar]
levels = [1, 3, 6, 10]

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.report.default_period, Granularity::Week);
        assert_eq!(config.report.timezone, TimeZoneChoice::Utc);
        assert_eq!(config.report.top_file_types, 5);
        assert_eq!(config.calendar.levels, LevelThresholds([1, 3, 6, 10]));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.max_files, 5);
    }

    #[test]
    fn test_unknown_period_is_rejected() {
        let toml = r#"
[report]
default_period = "fortnight"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_load_from_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[calendar]\nlevels = [4, 3, 2, 1]").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_paths() {
        assert!(Config::config_path().ends_with("uploadpulse/config.toml"));
        assert!(Config::log_path().ends_with("uploadpulse/uploadpulse.log"));
    }
}
