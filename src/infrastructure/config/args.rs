use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments of the `pixcache` binary.
#[derive(Debug, Parser)]
#[command(
    name = "pixcache",
    version,
    about = "Load images through a memory, disk and network cache chain",
    long_about = None
)]
pub struct CliArgs {
    /// Image URLs to load.
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Disk cache directory.
    #[arg(long, value_name = "PATH", env = "PIXCACHE_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Memory cache budget in bytes.
    #[arg(long)]
    pub memory_budget_bytes: Option<usize>,

    /// Download timeout in seconds (at least 1).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: Option<u64>,

    /// Load every URL this many times in sequence.
    #[arg(short, long, default_value_t = 1)]
    pub repeat: u32,

    /// Clear both cache tiers before loading.
    #[arg(long)]
    pub clear_cache: bool,

    /// Print results as JSON lines.
    #[arg(long)]
    pub json: bool,
}
