//! Infrastructure layer with adapters for the filesystem and network.

/// Application configuration.
pub mod config;
/// Image handling (caching, fetching, loading).
pub mod image;

pub use config::{AppConfig, CliArgs, ConfigStore, LogLevel};
pub use self::image::{
    CacheStats, DiskImageCache, ImageFetcher, ImageLoader, ImageLoaderConfig, LoadHandle,
    MemoryImageCache, ReqwestTransport,
};
