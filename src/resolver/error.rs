//! Error types for metadata probing.

use thiserror::Error;

/// Errors that can occur while probing a direct URL for metadata.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error probing {url}: {source}")]
    Network {
        /// The URL that failed to probe.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The origin answered the probe with a non-success status.
    #[error("upstream returned HTTP {status} probing {url}")]
    UpstreamStatus {
        /// The URL that was probed.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
}

impl ProbeError {
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
