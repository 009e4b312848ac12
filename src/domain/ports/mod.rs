mod http_client_port;
mod image_cache_port;

pub use http_client_port::{HttpClientPort, HttpResponse};
pub use image_cache_port::{CacheError, CacheResult, ImageCachePort, ImageLoaderPort};

/// Test doubles for the ports.
#[cfg(test)]
pub mod mocks {
    pub use super::http_client_port::MockHttpClientPort;
    pub use super::http_client_port::mock::FakeTransport;
}
