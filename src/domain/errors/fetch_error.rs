//! Network fetch error types.

use std::time::Duration;

use thiserror::Error;

/// Failures reported by an HTTP transport.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read body: {0}")]
    Body(String),
}

/// Coarse classification of a non-success HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum NetworkErrorKind {
    Unauthorized,
    RequestTimeout,
    Conflict,
    PayloadTooLarge,
    TooManyRequests,
    ServerError,
    Unknown,
}

impl NetworkErrorKind {
    /// Classifies an HTTP status code.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            408 => Self::RequestTimeout,
            409 => Self::Conflict,
            413 => Self::PayloadTooLarge,
            429 => Self::TooManyRequests,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unauthorized => "unauthorized",
            Self::RequestTimeout => "request timeout",
            Self::Conflict => "conflict",
            Self::PayloadTooLarge => "payload too large",
            Self::TooManyRequests => "too many requests",
            Self::ServerError => "server error",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Terminal failure of a network fetch.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("HTTP {status} ({kind})")]
    Status { status: u16, kind: NetworkErrorKind },

    #[error("fetch exceeded {0:?}")]
    Timeout(Duration),

    #[error("failed to decode image: {0}")]
    Decode(String),
}

impl FetchError {
    /// Creates a status error, classifying the code.
    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self::Status {
            status,
            kind: NetworkErrorKind::from_status(status),
        }
    }

    /// Short label for structured logging.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Timeout(_) => "timeout",
            Self::Decode(_) => "decode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(401, NetworkErrorKind::Unauthorized ; "unauthorized")]
    #[test_case(408, NetworkErrorKind::RequestTimeout ; "request_timeout")]
    #[test_case(409, NetworkErrorKind::Conflict ; "conflict")]
    #[test_case(413, NetworkErrorKind::PayloadTooLarge ; "payload_too_large")]
    #[test_case(429, NetworkErrorKind::TooManyRequests ; "too_many_requests")]
    #[test_case(500, NetworkErrorKind::ServerError ; "internal_error")]
    #[test_case(503, NetworkErrorKind::ServerError ; "unavailable")]
    #[test_case(404, NetworkErrorKind::Unknown ; "not_found")]
    #[test_case(302, NetworkErrorKind::Unknown ; "redirect")]
    fn test_status_classification(status: u16, expected: NetworkErrorKind) {
        assert_eq!(NetworkErrorKind::from_status(status), expected);
    }

    #[test]
    fn test_status_error_message() {
        let err = FetchError::status(503);
        assert_eq!(err.to_string(), "HTTP 503 (server error)");
        assert_eq!(err.kind_label(), "status");
    }

    #[test]
    fn test_transport_error_converts() {
        let err: FetchError = TransportError::Connect("refused".into()).into();
        assert!(matches!(err, FetchError::Transport(TransportError::Connect(_))));
        assert_eq!(err.kind_label(), "transport");
    }
}
