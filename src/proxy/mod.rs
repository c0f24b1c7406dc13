//! Stream relay from a direct URL to a caller.
//!
//! Re-issues a GET with stored credentials and hands back the upstream
//! status, a filtered subset of headers, and the body as a byte stream. The
//! body is never buffered whole: the caller pulls chunks as they arrive, so
//! backpressure flows from the downstream consumer to the upstream read. No
//! retry or resume logic exists for a stream interrupted mid-transfer.

mod error;

pub use error::StreamError;

use axum::body::Bytes;
use futures_util::Stream;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, COOKIE};
use reqwest::{Client, Response};
use tracing::{debug, instrument};

use crate::auth::Credentials;

/// Content type reported to the caller when upstream does not send one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// An opened upstream response, validated as successful, ready for relay.
///
/// Holds the three headers the proxy mirrors plus the live response body.
#[derive(Debug)]
pub struct ProxiedStream {
    status: u16,
    content_type: String,
    content_length: Option<u64>,
    content_disposition: Option<String>,
    response: Response,
}

impl ProxiedStream {
    /// Upstream status code (e.g. 200, or 206 for partial content).
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Upstream `Content-Type`, defaulting to a generic binary type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Upstream `Content-Length`, when present.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Upstream `Content-Disposition`, when present.
    #[must_use]
    pub fn content_disposition(&self) -> Option<&str> {
        self.content_disposition.as_deref()
    }

    /// Consumes the stream, yielding body chunks as they arrive upstream.
    pub fn into_bytes_stream(self) -> impl Stream<Item = Result<Bytes, reqwest::Error>> + Send {
        self.response.bytes_stream()
    }
}

/// Relays direct-URL byte streams with stored credentials.
#[derive(Debug, Clone)]
pub struct StreamProxy {
    client: Client,
}

impl StreamProxy {
    /// Creates a proxy over an existing HTTP client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Opens a direct URL for relay.
    ///
    /// Issues a GET with credentials, following redirects. The response is
    /// validated but its body is not read; the caller streams it via
    /// [`ProxiedStream::into_bytes_stream`].
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Network`] on transport failure, or
    /// [`StreamError::UpstreamStatus`] carrying the upstream status code
    /// when the origin does not answer with a success status — the status is
    /// surfaced verbatim, never substituted with a generic one.
    #[instrument(level = "debug", skip(self, credentials), fields(url = %url))]
    pub async fn open(
        &self,
        url: &str,
        credentials: &Credentials,
    ) -> Result<ProxiedStream, StreamError> {
        let response = self
            .client
            .get(url)
            .header(COOKIE, credentials.header_value())
            .send()
            .await
            .map_err(|error| StreamError::network(url, error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::upstream_status(url, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok());

        let content_disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(std::string::ToString::to_string);

        debug!(
            url = %url,
            status = status.as_u16(),
            content_length = content_length,
            "upstream stream opened"
        );

        Ok(ProxiedStream {
            status: status.as_u16(),
            content_type,
            content_length,
            content_disposition,
            response,
        })
    }
}
