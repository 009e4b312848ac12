//! Port for the HTTP transport used by the image fetcher.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::TransportError;

/// Status and full body of a GET response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Minimal HTTP capability: issue a GET and receive status plus body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    /// Performs a GET request and reads the whole body.
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use parking_lot::Mutex;

    /// Scripted transport that counts requests and can stall.
    pub struct FakeTransport {
        routes: Mutex<HashMap<String, HttpResponse>>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl FakeTransport {
        /// Creates a transport that answers 404 for unknown URLs.
        pub fn new() -> Self {
            Self {
                routes: Mutex::new(HashMap::new()),
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        /// Makes every request wait before answering.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Registers a response for a URL.
        pub fn route(self, url: &str, response: HttpResponse) -> Self {
            self.routes.lock().insert(url.to_string(), response);
            self
        }

        /// Number of requests issued so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Default for FakeTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl HttpClientPort for FakeTransport {
        async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let response = self.routes.lock().get(url).cloned();
            Ok(response.unwrap_or_else(|| HttpResponse::new(404, Bytes::new())))
        }
    }
}
