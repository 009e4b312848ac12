//! Locating and reading `config.toml`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use super::app_config::AppConfig;
use super::project_dirs;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Failure to read or create the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem error while reading or writing the file.
    #[error("config file {path}: {source}")]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Defaults could not be rendered as TOML.
    #[error("failed to render default config: {0}")]
    Render(#[from] toml::ser::Error),
}

/// A single `config.toml` on disk.
///
/// Loading never fails on content: a malformed file yields the defaults.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Uses `path` as the configuration file.
    #[must_use]
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Picks `path_override` if given, else `config.toml` in the platform
    /// config directory, else one under the temp directory.
    #[must_use]
    pub fn locate(path_override: Option<&Path>) -> Self {
        let path = path_override.map_or_else(
            || {
                project_dirs().map_or_else(
                    || std::env::temp_dir().join(crate::NAME),
                    |dirs| dirs.config_dir().to_path_buf(),
                )
                .join(CONFIG_FILE_NAME)
            },
            Path::to_path_buf,
        );
        Self { path }
    }

    /// Location of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the configuration.
    ///
    /// A missing file is created with the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read, or if
    /// the default file cannot be written.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No config file, writing defaults");
                let config = AppConfig::default();
                self.write_defaults(&config)?;
                return Ok(config);
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        toml::from_str(&content).or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Malformed config file, using defaults");
            Ok(AppConfig::default())
        })
    }

    fn write_defaults(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let rendered = toml::to_string_pretty(config)?;
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(io_err)?;

        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        file.write_all(rendered.as_bytes()).map_err(io_err)?;
        file.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::LogLevel;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let store = ConfigStore::at(path.clone());

        let config = store.load().unwrap();

        assert_eq!(config.log_level, LogLevel::Info);
        let written: AppConfig = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.memory_budget_bytes, config.memory_budget_bytes);
        assert_eq!(written.request_timeout_secs, config.request_timeout_secs);
    }

    #[test]
    fn test_malformed_file_falls_back_and_is_kept() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "memory_budget_bytes = [").unwrap();

        let config = ConfigStore::at(path.clone()).load().unwrap();

        assert_eq!(config.memory_budget_bytes, AppConfig::default().memory_budget_bytes);
        assert_eq!(fs::read_to_string(&path).unwrap(), "memory_budget_bytes = [");
    }

    #[test]
    fn test_values_are_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "request_timeout_secs = 5\nlog_level = \"warn\"\n").unwrap();

        let config = ConfigStore::at(path).load().unwrap();

        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_locate_prefers_override() {
        let dir = tempdir().unwrap();
        let custom = dir.path().join("custom.toml");

        assert_eq!(ConfigStore::locate(Some(&custom)).path(), custom);
        assert!(ConfigStore::locate(None).path().ends_with(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_unreadable_path_is_an_error() {
        let dir = tempdir().unwrap();
        // A directory cannot be read as a file.
        let err = ConfigStore::at(dir.path().to_path_buf()).load().unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
