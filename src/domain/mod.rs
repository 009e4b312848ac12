//! Domain layer with core entities, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{CacheKey, CachedImage, DiskEntryId, ImageSource, LoadedImage};
pub use errors::{FetchError, NetworkErrorKind, TransportError};
pub use ports::{
    CacheError, CacheResult, HttpClientPort, HttpResponse, ImageCachePort, ImageLoaderPort,
};
