//! Metadata resolution for direct URLs.
//!
//! Obtains file metadata (MIME type, size, filename) using the cheapest
//! request the origin will honor: a HEAD probe, retried once as a GET
//! restricted to the first byte when the origin rejects HEAD outright. This
//! avoids downloading a full file merely to read its headers.

mod error;
mod filename;

pub use error::ProbeError;

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, RANGE};
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::auth::Credentials;
use filename::{filename_from_disposition, filename_from_url};

/// File metadata derived strictly from the response headers of a probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    /// MIME type from `Content-Type`, when reported.
    pub mime: Option<String>,
    /// Byte count from `Content-Length`, when reported.
    pub size: Option<u64>,
    /// Filename from `Content-Disposition`, else derived from the URL path.
    /// Always non-empty.
    pub name: String,
}

/// Probes direct URLs for metadata with stored credentials.
#[derive(Debug, Clone)]
pub struct MetadataResolver {
    client: Client,
}

impl MetadataResolver {
    /// Creates a resolver over an existing HTTP client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches metadata for a direct URL.
    ///
    /// Issues a HEAD request with credentials, following redirects. Origins
    /// that answer HEAD with 405 or 403 get exactly one follow-up GET with
    /// `Range: bytes=0-0`; there are no further retries.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Network`] on transport failure, or
    /// [`ProbeError::UpstreamStatus`] when the final response is not a
    /// success status (206 counts as success).
    #[instrument(level = "debug", skip(self, credentials), fields(url = %url))]
    pub async fn fetch_metadata(
        &self,
        url: &str,
        credentials: &Credentials,
    ) -> Result<FileMetadata, ProbeError> {
        let mut response = self
            .client
            .head(url)
            .header(COOKIE, credentials.header_value())
            .send()
            .await
            .map_err(|error| ProbeError::network(url, error))?;

        if matches!(response.status().as_u16(), 405 | 403) {
            debug!(url = %url, status = response.status().as_u16(), "HEAD rejected, retrying with ranged GET");
            response = self
                .client
                .get(url)
                .header(COOKIE, credentials.header_value())
                .header(RANGE, "bytes=0-0")
                .send()
                .await
                .map_err(|error| ProbeError::network(url, error))?;
        }

        if !response.status().is_success() {
            return Err(ProbeError::upstream_status(url, response.status().as_u16()));
        }

        Ok(metadata_from_response(url, &response))
    }
}

/// Derives metadata from probe response headers.
fn metadata_from_response(url: &str, response: &Response) -> FileMetadata {
    let mime = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(std::string::ToString::to_string);

    let size = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    let name = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(filename_from_disposition)
        .unwrap_or_else(|| filename_from_url(url));

    FileMetadata { mime, size, name }
}
