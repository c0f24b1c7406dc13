//! Error types for the stream proxy.

use thiserror::Error;

/// Errors that can occur while opening an upstream stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error streaming {url}: {source}")]
    Network {
        /// The URL that failed to open.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The origin answered with a non-success status; the status is carried
    /// so callers can distinguish e.g. an expired link (404) from forbidden
    /// (403) from rate-limited (429).
    #[error("upstream returned {status}")]
    UpstreamStatus {
        /// The URL that was requested.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
}

impl StreamError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an upstream-status error.
    pub fn upstream_status(url: impl Into<String>, status: u16) -> Self {
        Self::UpstreamStatus {
            url: url.into(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_error_upstream_status_display() {
        let error = StreamError::upstream_status("https://example.com/f", 429);
        assert!(error.to_string().contains("429"));
    }
}
