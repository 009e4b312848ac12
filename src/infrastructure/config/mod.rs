//! Application configuration.

/// Configuration values and their defaults.
pub mod app_config;
/// Command-line arguments.
pub mod args;
/// Reading `config.toml`.
pub mod store;

use directories::ProjectDirs;

pub use app_config::{AppConfig, LogLevel};
pub use args::CliArgs;
pub use store::{ConfigError, ConfigStore};

const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "pixcache";
const APP_NAME: &str = "pixcache";

/// Platform directories for this application.
#[must_use]
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
}
