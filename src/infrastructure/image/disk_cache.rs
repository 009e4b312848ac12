//! Disk-based image cache for persistence across sessions.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, trace, warn};

use crate::domain::entities::{CacheKey, CachedImage};
use crate::domain::ports::{CacheError, CacheResult};
use crate::infrastructure::config::project_dirs;

/// Extension of committed cache entries.
const ENTRY_EXTENSION: &str = "png";

/// Disk-based image cache storing PNG-encoded images, one file per key.
///
/// Files are named after the key's [`DiskEntryId`](crate::domain::DiskEntryId).
/// Writes land in a temporary sibling and are renamed into place, so a
/// reader only ever sees complete entries.
#[derive(Debug)]
pub struct DiskImageCache {
    cache_dir: PathBuf,
}

impl DiskImageCache {
    /// Creates a new disk cache in the specified directory.
    ///
    /// # Errors
    /// Returns error if cache directory cannot be created.
    pub async fn new(cache_dir: PathBuf) -> CacheResult<Self> {
        fs::create_dir_all(&cache_dir)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to create cache dir: {e}")))?;
        debug!(path = %cache_dir.display(), "Disk image cache ready");
        Ok(Self { cache_dir })
    }

    /// Creates a cache in the platform cache directory.
    ///
    /// # Errors
    /// Returns error if cache directory cannot be created.
    pub async fn default_location() -> CacheResult<Self> {
        Self::new(default_cache_dir()).await
    }

    /// Directory holding the entries.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path for a cached image.
    #[must_use]
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{ENTRY_EXTENSION}", key.disk_entry_id()))
    }

    /// Gets encoded image bytes from disk cache.
    ///
    /// # Errors
    /// Returns error if the entry exists but cannot be read.
    pub async fn get_bytes(&self, key: &CacheKey) -> CacheResult<Option<Vec<u8>>> {
        let path = self.entry_path(key);
        match fs::read(&path).await {
            Ok(bytes) => {
                trace!(key = %key, path = %path.display(), "Disk cache hit");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                trace!(key = %key, "Disk cache miss");
                Ok(None)
            }
            Err(e) => Err(CacheError::IoError(format!(
                "Failed to read cache file {}: {e}",
                path.display()
            ))),
        }
    }

    /// Loads and decodes an image from disk cache.
    ///
    /// Undecodable entries are reported as a miss.
    ///
    /// # Errors
    /// Returns error if the entry exists but cannot be read.
    pub async fn get(&self, key: &CacheKey) -> CacheResult<Option<CachedImage>> {
        let Some(bytes) = self.get_bytes(key).await? else {
            return Ok(None);
        };

        let result = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await;

        match result {
            Ok(Ok(img)) => {
                debug!(key = %key, "Decoded image from disk cache");
                Ok(Some(CachedImage::new(img)))
            }
            Ok(Err(e)) => {
                warn!(key = %key, error = %e, "Failed to decode cached image");
                Ok(None)
            }
            Err(e) => {
                error!(key = %key, error = %e, "Decode task panicked");
                Ok(None)
            }
        }
    }

    /// Encodes an image as PNG and stores it, replacing any previous entry.
    ///
    /// # Errors
    /// Returns error if encoding fails or the file cannot be written.
    pub async fn put(&self, key: &CacheKey, image: &CachedImage) -> CacheResult<()> {
        let image = image.clone();
        let encoded = tokio::task::spawn_blocking(move || {
            let mut buf = Vec::new();
            image
                .as_dynamic()
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .map(|()| buf)
        })
        .await
        .map_err(|e| CacheError::EncodeError(format!("Encode task panicked: {e}")))?
        .map_err(|e| CacheError::EncodeError(format!("Failed to encode image: {e}")))?;

        self.put_bytes(key, &encoded).await
    }

    /// Stores already-encoded bytes, replacing any previous entry.
    ///
    /// # Errors
    /// Returns error if file cannot be created, written or renamed.
    pub async fn put_bytes(&self, key: &CacheKey, bytes: &[u8]) -> CacheResult<()> {
        let path = self.entry_path(key);
        let dir = self.cache_dir.clone();

        let temp = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(".pending-")
                .suffix(".tmp")
                .tempfile_in(dir)
        })
        .await
        .map_err(|e| CacheError::IoError(format!("Cache file task panicked: {e}")))?
        .map_err(|e| CacheError::IoError(format!("Failed to create cache file: {e}")))?;
        // Dropping `temp_path` before `persist` deletes the temp file.
        let (std_file, temp_path) = temp.into_parts();
        let mut file = fs::File::from_std(std_file);

        file.write_all(bytes)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to write cache file: {e}")))?;

        file.flush()
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to flush cache file: {e}")))?;
        drop(file);

        let target = path.clone();
        tokio::task::spawn_blocking(move || temp_path.persist(target).map_err(|e| e.error))
            .await
            .map_err(|e| CacheError::IoError(format!("Cache file task panicked: {e}")))?
            .map_err(|e| CacheError::IoError(format!("Failed to persist cache file: {e}")))?;

        debug!(key = %key, path = %path.display(), size = bytes.len(), "Stored image in disk cache");
        Ok(())
    }

    /// Checks if an image is cached.
    pub async fn contains(&self, key: &CacheKey) -> bool {
        fs::try_exists(self.entry_path(key)).await.unwrap_or(false)
    }

    /// Removes an image from disk cache. A missing entry is not an error.
    ///
    /// # Errors
    /// Returns error if an existing entry cannot be removed.
    pub async fn remove(&self, key: &CacheKey) -> CacheResult<()> {
        match fs::remove_file(self.entry_path(key)).await {
            Ok(()) => {
                debug!(key = %key, "Removed from disk cache");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::IoError(format!("Failed to remove cache file: {e}"))),
        }
    }

    /// Clears every entry from the disk cache.
    ///
    /// # Errors
    /// Returns error if cache directory cannot be read.
    pub async fn clear(&self) -> CacheResult<()> {
        let mut entries = fs::read_dir(&self.cache_dir)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to read cache dir: {e}")))?;

        let mut removed = 0usize;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to read entry: {e}")))?
        {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != ENTRY_EXTENSION) {
                continue;
            }
            if let Err(e) = fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %e, "Failed to remove cache file");
            } else {
                removed += 1;
            }
        }
        debug!(removed = removed, "Cleared disk cache");
        Ok(())
    }
}

/// Returns the default cache directory path.
fn default_cache_dir() -> PathBuf {
    project_dirs().map_or_else(
        || {
            std::env::temp_dir()
                .join("pixcache")
                .join("cache")
                .join("images")
        },
        |dirs| dirs.cache_dir().join("images"),
    )
}
