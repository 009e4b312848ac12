//! Async image loading orchestrator.
//!
//! Implements a three-tier cache: Memory -> Disk -> Network

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{CacheKey, CachedImage, ImageSource, LoadedImage};
use crate::domain::errors::FetchError;
use crate::domain::ports::{
    CacheError, CacheResult, HttpClientPort, ImageCachePort, ImageLoaderPort,
};
use crate::infrastructure::config::AppConfig;

use super::disk_cache::DiskImageCache;
use super::fetcher::{DEFAULT_FETCH_TIMEOUT, ImageFetcher};
use super::memory_cache::{CacheStats, DEFAULT_MEMORY_BUDGET, MemoryImageCache};
use super::transport::ReqwestTransport;

/// Configuration for the image loader.
#[derive(Debug, Clone)]
pub struct ImageLoaderConfig {
    /// Byte budget of the memory tier.
    pub memory_budget_bytes: usize,
    /// Upper bound for a single network fetch.
    pub fetch_timeout: Duration,
}

impl Default for ImageLoaderConfig {
    fn default() -> Self {
        Self {
            memory_budget_bytes: DEFAULT_MEMORY_BUDGET,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl From<&AppConfig> for ImageLoaderConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            memory_budget_bytes: config.memory_budget_bytes,
            fetch_timeout: config.request_timeout(),
        }
    }
}

/// Orchestrates image loading from memory, disk, and network.
///
/// One instance is shared per process; every tier is reached only through
/// this type, and no lock spans more than one tier.
pub struct ImageLoader {
    memory_cache: Arc<MemoryImageCache>,
    disk_cache: Arc<DiskImageCache>,
    fetcher: ImageFetcher,
    config: ImageLoaderConfig,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ImageLoader {
    /// Creates a loader over an existing disk cache and HTTP transport.
    #[must_use]
    pub fn new(
        config: ImageLoaderConfig,
        disk_cache: Arc<DiskImageCache>,
        transport: Arc<dyn HttpClientPort>,
    ) -> Self {
        let memory_cache = Arc::new(MemoryImageCache::new(config.memory_budget_bytes));
        let fetcher = ImageFetcher::new(transport, config.fetch_timeout);

        Self {
            memory_cache,
            disk_cache,
            fetcher,
            config,
        }
    }

    /// Creates a loader with a `reqwest` transport.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_reqwest(
        config: ImageLoaderConfig,
        disk_cache: Arc<DiskImageCache>,
    ) -> CacheResult<Self> {
        let transport = ReqwestTransport::new(config.fetch_timeout)
            .map_err(|e| CacheError::NetworkError(e.to_string()))?;
        Ok(Self::new(config, disk_cache, Arc::new(transport)))
    }

    /// Loads an image, checking caches first.
    ///
    /// Returns `None` when no tier produced an image or when `cancel` fired
    /// first. A cancelled load stops at its current await point and writes
    /// nothing further to either tier.
    pub async fn load(&self, key: &CacheKey, cancel: &CancellationToken) -> Option<LoadedImage> {
        if cancel.is_cancelled() {
            debug!(key = %key, "Image load cancelled before start");
            return None;
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(key = %key, "Image load cancelled");
                None
            }
            result = self.resolve(key) => match result {
                Ok(loaded) => {
                    debug!(key = %key, source = %loaded.source, "Image loaded successfully");
                    Some(loaded)
                }
                Err(e) => {
                    debug!(key = %key, error = %e, "No image produced");
                    None
                }
            }
        }
    }

    async fn resolve(&self, key: &CacheKey) -> Result<LoadedImage, FetchError> {
        if let Some(image) = self.memory_cache.get(key).await {
            return Ok(LoadedImage {
                key: key.clone(),
                image,
                source: ImageSource::MemoryCache,
            });
        }

        match self.disk_cache.get(key).await {
            Ok(Some(image)) => {
                self.memory_cache.put(key.clone(), image.clone()).await;
                return Ok(LoadedImage {
                    key: key.clone(),
                    image,
                    source: ImageSource::DiskCache,
                });
            }
            Ok(None) => {}
            Err(e) => {
                warn!(key = %key, error = %e, "Disk cache read failed, falling back to network");
            }
        }

        let image = self.fetcher.fetch(key).await?;

        if let Err(e) = self.disk_cache.put(key, &image).await {
            warn!(key = %key, error = %e, "Failed to cache to disk");
        }
        self.memory_cache.put(key.clone(), image.clone()).await;

        Ok(LoadedImage {
            key: key.clone(),
            image,
            source: ImageSource::Network,
        })
    }

    /// Starts loading an image on a background task.
    ///
    /// Dropping the returned handle cancels the load.
    #[must_use = "dropping the handle cancels the load"]
    pub fn spawn_load(self: &Arc<Self>, key: CacheKey) -> LoadHandle {
        let token = CancellationToken::new();
        let loader = Arc::clone(self);
        let task_token = token.clone();
        let task = tokio::spawn(async move { loader.load(&key, &task_token).await });
        LoadHandle { token, task }
    }

    /// Checks memory cache without promoting the entry.
    #[must_use]
    pub fn check_memory_cache(&self, key: &CacheKey) -> Option<CachedImage> {
        self.memory_cache.peek(key)
    }

    /// Memory tier shared by this loader.
    #[must_use]
    pub const fn memory_cache(&self) -> &Arc<MemoryImageCache> {
        &self.memory_cache
    }

    /// Disk tier shared by this loader.
    #[must_use]
    pub const fn disk_cache(&self) -> &Arc<DiskImageCache> {
        &self.disk_cache
    }

    /// Returns memory cache statistics.
    #[must_use]
    pub fn memory_cache_stats(&self) -> CacheStats {
        self.memory_cache.stats()
    }

    /// Clears all caches.
    pub async fn clear_all(&self) {
        self.memory_cache.clear().await;
        if let Err(e) = self.disk_cache.clear().await {
            warn!(error = %e, "Failed to clear disk cache");
        }
        info!("Cleared all image caches");
    }
}

#[async_trait::async_trait]
impl ImageLoaderPort for ImageLoader {
    async fn load(&self, key: &CacheKey, cancel: &CancellationToken) -> Option<LoadedImage> {
        Self::load(self, key, cancel).await
    }
}

/// Handle to a load running on its own task.
#[derive(Debug)]
pub struct LoadHandle {
    token: CancellationToken,
    task: JoinHandle<Option<LoadedImage>>,
}

impl LoadHandle {
    /// Abandons interest in the result.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns true once the task has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the load to finish.
    pub async fn result(mut self) -> Option<LoadedImage> {
        match (&mut self.task).await {
            Ok(result) => result,
            Err(e) if e.is_panic() => {
                error!(error = %e, "Image load task panicked");
                None
            }
            Err(_) => None,
        }
    }
}

impl Drop for LoadHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
