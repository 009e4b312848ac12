//! Network tier: downloads and decodes images.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::entities::{CacheKey, CachedImage};
use crate::domain::errors::FetchError;
use crate::domain::ports::HttpClientPort;

/// Default upper bound for a single fetch, request plus body.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads the URL a key denotes and decodes the body.
#[derive(Clone)]
pub struct ImageFetcher {
    transport: Arc<dyn HttpClientPort>,
    timeout: Duration,
}

impl std::fmt::Debug for ImageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFetcher")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ImageFetcher {
    /// Creates a fetcher over the given transport.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpClientPort>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Fetches and decodes the image for `key`.
    ///
    /// Failures are logged here; callers only need success or failure.
    ///
    /// # Errors
    /// Returns error on transport failure, non-2xx status, timeout or
    /// undecodable body.
    pub async fn fetch(&self, key: &CacheKey) -> Result<CachedImage, FetchError> {
        let result = self.fetch_inner(key).await;
        if let Err(e) = &result {
            warn!(key = %key, kind = e.kind_label(), error = %e, "Image fetch failed");
        }
        result
    }

    async fn fetch_inner(&self, key: &CacheKey) -> Result<CachedImage, FetchError> {
        debug!(key = %key, "Downloading image from network");

        let response = tokio::time::timeout(self.timeout, self.transport.get(key.as_str()))
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))??;

        if !response.is_success() {
            return Err(FetchError::status(response.status));
        }

        let body = response.body;
        let size = body.len();
        let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&body))
            .await
            .map_err(|e| FetchError::Decode(format!("Decode task panicked: {e}")))?
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        debug!(key = %key, size = size, "Image downloaded and decoded");
        Ok(CachedImage::new(decoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{NetworkErrorKind, TransportError};
    use crate::domain::ports::HttpResponse;
    use crate::domain::ports::mocks::{FakeTransport, MockHttpClientPort};

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        image::DynamicImage::new_rgb8(w, h)
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn fetcher_with(mock: MockHttpClientPort) -> ImageFetcher {
        ImageFetcher::new(Arc::new(mock), DEFAULT_FETCH_TIMEOUT)
    }

    #[tokio::test]
    async fn test_fetch_decodes_success_body() {
        let body = png_bytes(12, 8);
        let mut mock = MockHttpClientPort::new();
        mock.expect_get()
            .withf(|url| url.contains("example.org/a.png"))
            .times(1)
            .returning(move |_| Ok(HttpResponse::new(200, body.clone())));

        let img = fetcher_with(mock)
            .fetch(&CacheKey::new("https://example.org/a.png"))
            .await
            .unwrap();

        assert_eq!((img.width(), img.height()), (12, 8));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let mut mock = MockHttpClientPort::new();
        mock.expect_get()
            .returning(|_| Ok(HttpResponse::new(503, png_bytes(1, 1))));

        let err = fetcher_with(mock)
            .fetch(&CacheKey::new("https://example.org/a.png"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetchError::Status {
                status: 503,
                kind: NetworkErrorKind::ServerError
            }
        ));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_error() {
        let mut mock = MockHttpClientPort::new();
        mock.expect_get()
            .returning(|_| Ok(HttpResponse::new(200, &b"<html>nope</html>"[..])));

        let err = fetcher_with(mock)
            .fetch(&CacheKey::new("https://example.org/a.png"))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_transport_error_is_error() {
        let mut mock = MockHttpClientPort::new();
        mock.expect_get()
            .returning(|_| Err(TransportError::Connect("connection refused".into())));

        let err = fetcher_with(mock)
            .fetch(&CacheKey::new("https://example.invalid/a.png"))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Transport(TransportError::Connect(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_enforced() {
        let transport = FakeTransport::new()
            .with_delay(Duration::from_secs(3600))
            .route("https://slow.example/a.png", HttpResponse::new(200, png_bytes(1, 1)));
        let fetcher = ImageFetcher::new(Arc::new(transport), Duration::from_secs(5));

        let err = fetcher
            .fetch(&CacheKey::new("https://slow.example/a.png"))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Timeout(d) if d == Duration::from_secs(5)));
    }
}
