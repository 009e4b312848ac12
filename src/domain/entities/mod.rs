mod cache_key;
mod cached_image;

pub use cache_key::{CacheKey, DiskEntryId};
pub use cached_image::{CachedImage, ImageSource, LoadedImage};
