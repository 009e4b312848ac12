//! In-memory LRU image cache bounded by decoded byte size.

use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::domain::entities::{CacheKey, CachedImage};
use crate::domain::ports::ImageCachePort;

/// Default byte budget for decoded images (20 MiB).
pub const DEFAULT_MEMORY_BUDGET: usize = 20 * 1024 * 1024;

struct Entries {
    lru: LruCache<CacheKey, CachedImage>,
    used_bytes: usize,
}

impl Entries {
    fn remove(&mut self, key: &CacheKey) -> Option<CachedImage> {
        let removed = self.lru.pop(key)?;
        self.used_bytes -= removed.size_bytes();
        Some(removed)
    }
}

/// In-memory LRU cache for decoded images.
///
/// Entries are weighed by [`CachedImage::size_bytes`]; the total never
/// exceeds the budget given at construction.
pub struct MemoryImageCache {
    entries: Mutex<Entries>,
    capacity_bytes: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryImageCache {
    /// Creates a new cache with the specified byte budget.
    #[must_use]
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(Entries {
                lru: LruCache::unbounded(),
                used_bytes: 0,
            }),
            capacity_bytes,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Configured byte budget.
    #[must_use]
    pub const fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    /// Bytes currently held.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.entries.lock().used_bytes
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        let (size, used_bytes) = {
            let entries = self.entries.lock();
            (entries.lru.len(), entries.used_bytes)
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size,
            used_bytes,
        }
    }

    /// Peeks at an image without promoting it in the LRU.
    #[must_use]
    pub fn peek(&self, key: &CacheKey) -> Option<CachedImage> {
        self.entries.lock().lru.peek(key).cloned()
    }

    /// Returns true if the key is cached, without promoting it.
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.lock().lru.contains(key)
    }

    fn insert(&self, key: CacheKey, image: CachedImage) {
        let size = image.size_bytes();
        let mut entries = self.entries.lock();

        entries.remove(&key);

        if size > self.capacity_bytes {
            debug!(
                key = %key,
                size = size,
                capacity = self.capacity_bytes,
                "Image larger than memory budget, not cached"
            );
            return;
        }

        while entries.used_bytes + size > self.capacity_bytes {
            let Some((evicted, img)) = entries.lru.pop_lru() else {
                break;
            };
            entries.used_bytes -= img.size_bytes();
            trace!(key = %evicted, size = img.size_bytes(), "Evicted least recently used image");
        }

        entries.used_bytes += size;
        entries.lru.put(key, image);
    }
}

impl std::fmt::Debug for MemoryImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryImageCache")
            .field("capacity_bytes", &self.capacity_bytes)
            .finish_non_exhaustive()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached images.
    pub size: usize,
    /// Decoded bytes currently held.
    pub used_bytes: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images ({} bytes), {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.used_bytes, self.hit_rate, self.hits, self.misses
        )
    }
}

#[async_trait::async_trait]
impl ImageCachePort for MemoryImageCache {
    async fn get(&self, key: &CacheKey) -> Option<CachedImage> {
        let found = self.entries.lock().lru.get(key).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache miss");
        }
        found
    }

    async fn put(&self, key: CacheKey, image: CachedImage) {
        debug!(key = %key, size = image.size_bytes(), "Storing image in memory cache");
        self.insert(key, image);
    }

    async fn evict(&self, key: &CacheKey) {
        if self.entries.lock().remove(key).is_some() {
            debug!(key = %key, "Evicted image from memory cache");
        }
    }

    fn len(&self) -> usize {
        self.entries.lock().lru.len()
    }

    async fn clear(&self) {
        {
            let mut entries = self.entries.lock();
            entries.lru.clear();
            entries.used_bytes = 0;
        }
        debug!("Cleared memory image cache");
    }
}
