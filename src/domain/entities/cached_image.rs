//! Domain types for decoded images.

use std::sync::Arc;

use image::DynamicImage;

use super::CacheKey;

/// A decoded bitmap shared between cache tiers and callers.
///
/// Immutable once created. Cloning shares the pixel buffer.
#[derive(Debug, Clone)]
pub struct CachedImage {
    image: Arc<DynamicImage>,
    size_bytes: usize,
}

impl CachedImage {
    /// Wraps a decoded image, computing its accounting size.
    #[must_use]
    pub fn new(image: DynamicImage) -> Self {
        let size_bytes = image.as_bytes().len();
        Self {
            image: Arc::new(image),
            size_bytes,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Size of the decoded pixel buffer, used for memory budget accounting.
    #[must_use]
    pub const fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Borrows the decoded image.
    #[must_use]
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// True when both values share the same pixel buffer.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }
}

/// Where an image was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    /// Loaded from in-memory LRU cache.
    #[serde(rename = "memory")]
    MemoryCache,
    /// Loaded from disk cache.
    #[serde(rename = "disk")]
    DiskCache,
    /// Downloaded from network.
    Network,
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoryCache => write!(f, "memory"),
            Self::DiskCache => write!(f, "disk"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// Result of a successful load.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Key that was requested.
    pub key: CacheKey,
    /// The decoded image.
    pub image: CachedImage,
    /// Tier that produced the image.
    pub source: ImageSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_bytes_tracks_pixel_buffer() {
        let rgb = CachedImage::new(DynamicImage::new_rgb8(10, 4));
        assert_eq!(rgb.size_bytes(), 10 * 4 * 3);

        let rgba = CachedImage::new(DynamicImage::new_rgba8(10, 4));
        assert_eq!(rgba.size_bytes(), 10 * 4 * 4);
        assert_eq!((rgba.width(), rgba.height()), (10, 4));
    }

    #[test]
    fn test_clone_shares_buffer() {
        let img = CachedImage::new(DynamicImage::new_rgb8(2, 2));
        let copy = img.clone();
        assert!(img.ptr_eq(&copy));
        assert!(!img.ptr_eq(&CachedImage::new(DynamicImage::new_rgb8(2, 2))));
    }

    #[test]
    fn test_source_display() {
        assert_eq!(ImageSource::MemoryCache.to_string(), "memory");
        assert_eq!(ImageSource::DiskCache.to_string(), "disk");
        assert_eq!(ImageSource::Network.to_string(), "network");
    }
}
