//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::args::CliArgs;
use super::project_dirs;
use crate::infrastructure::image::{DEFAULT_FETCH_TIMEOUT, DEFAULT_MEMORY_BUDGET};

const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from `config.toml` and CLI overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Directory for the disk image cache.
    /// Defaults to the platform cache directory.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Byte budget of the in-memory image cache.
    #[serde(default = "default_memory_budget")]
    pub memory_budget_bytes: usize,

    /// Upper bound for a single image download, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(cache_dir) = &args.cache_dir {
            self.cache_dir = Some(cache_dir.clone());
        }
        if let Some(budget) = args.memory_budget_bytes {
            self.memory_budget_bytes = budget;
        }
        if let Some(timeout) = args.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_dir().join("pixcache.log"))
    }

    /// Download timeout; zero is raised to one second.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(MIN_REQUEST_TIMEOUT_SECS))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            log_level: LogLevel::Info,
            cache_dir: None,
            memory_budget_bytes: default_memory_budget(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

const fn default_memory_budget() -> usize {
    DEFAULT_MEMORY_BUDGET
}

const fn default_request_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT.as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::image::ImageLoaderConfig;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"
            cache_dir = "/var/cache/pixcache"
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.cache_dir, Some(PathBuf::from("/var/cache/pixcache")));
        assert_eq!(config.memory_budget_bytes, 20 * 1024 * 1024);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.cache_dir.is_none());
        assert!(config.request_timeout_secs > 0);
    }

    #[test]
    fn test_args_override_config() {
        let mut config = AppConfig::default();
        let args = CliArgs::parse_from([
            "pixcache",
            "--memory-budget-bytes",
            "1024",
            "--log-level",
            "trace",
            "https://example.org/a.png",
        ]);

        config.merge_with_args(&args);

        assert_eq!(config.memory_budget_bytes, 1024);
        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_zero_timeout_is_raised() {
        let config: AppConfig = toml::from_str("request_timeout_secs = 0").unwrap();

        assert_eq!(config.request_timeout(), Duration::from_secs(1));
        assert_eq!(
            ImageLoaderConfig::from(&config).fetch_timeout,
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_zero_timeout_flag_is_rejected() {
        let result = CliArgs::try_parse_from([
            "pixcache",
            "--request-timeout-secs",
            "0",
            "https://example.org/a.png",
        ]);

        assert!(result.is_err());
    }
}
