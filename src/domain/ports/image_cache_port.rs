//! Port definitions for image caching and loading.

use tokio_util::sync::CancellationToken;

use crate::domain::entities::{CacheKey, CachedImage, LoadedImage};

/// Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors that can occur during cache operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// I/O error during cache operation.
    #[error("IO error: {0}")]
    IoError(String),
    /// Failed to encode an image for storage.
    #[error("Encode error: {0}")]
    EncodeError(String),
    /// Network setup error.
    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Port for the in-memory image tier.
/// Implementations must be thread-safe.
#[async_trait::async_trait]
pub trait ImageCachePort: Send + Sync {
    /// Attempts to get an image from the cache, marking it recently used.
    /// Returns None if not cached.
    async fn get(&self, key: &CacheKey) -> Option<CachedImage>;

    /// Stores an image in the cache.
    async fn put(&self, key: CacheKey, image: CachedImage);

    /// Removes an image from the cache.
    async fn evict(&self, key: &CacheKey);

    /// Returns the current number of cached images.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all images from the cache.
    async fn clear(&self);
}

/// Port for loading images through the cache chain.
#[async_trait::async_trait]
pub trait ImageLoaderPort: Send + Sync {
    /// Loads an image, checking caches first then network.
    /// Returns None when no image could be produced or the load was cancelled.
    async fn load(&self, key: &CacheKey, cancel: &CancellationToken) -> Option<LoadedImage>;
}
