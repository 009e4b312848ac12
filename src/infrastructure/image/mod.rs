//! Image handling infrastructure.
//!
//! This module provides:
//! - Memory caching with size-bounded LRU eviction
//! - Disk caching for persistence
//! - Network fetching over a pluggable HTTP transport
//! - Cancellable three-tier loading

pub mod disk_cache;
pub mod fetcher;
pub mod loader;
pub mod memory_cache;
pub mod transport;

pub use disk_cache::DiskImageCache;
pub use fetcher::{DEFAULT_FETCH_TIMEOUT, ImageFetcher};
pub use loader::{ImageLoader, ImageLoaderConfig, LoadHandle};
pub use memory_cache::{CacheStats, DEFAULT_MEMORY_BUDGET, MemoryImageCache};
pub use transport::ReqwestTransport;
