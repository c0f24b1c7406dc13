//! Service-level error taxonomy and wire codes.
//!
//! Input-validation failures are caller faults (4xx). `NO_FILES_FOUND` and
//! `NO_DIRECT_URL` are expected, non-exceptional outcomes of best-effort
//! extraction against an origin with no stable contract; they are kept
//! distinct from `SERVER_ERROR`, which signals an infrastructure fault.
//! `UPSTREAM_ERROR` carries the origin's HTTP status so callers can tell an
//! expired link (404) from forbidden (403) from rate-limited (429).

use thiserror::Error;

use crate::crawler::CrawlError;
use crate::proxy::StreamError;
use crate::resolver::ProbeError;

/// Structured failure for one service operation.
///
/// Every variant maps to a machine-readable wire code plus the
/// human-readable `Display` message; none of them crash the process, and a
/// single request's failure never affects other concurrent requests.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request did not carry a folder or file URL.
    #[error("request is missing the folder or file URL")]
    MissingUrl,

    /// No session cookie was supplied with the request and none is configured
    /// on the server.
    #[error("no session cookie was supplied and none is configured")]
    MissingCookie,

    /// The crawl completed but extracted nothing; the origin's current
    /// layout/API may not match any known listing shape for this link.
    #[error(
        "opened the folder, but could not read the file list; the origin layout/API may differ for this link"
    )]
    NoFilesFound,

    /// The pick index fell outside `[0, count)` for the recomputed listing.
    #[error("pick must be between 0 and {max}")]
    BadPick {
        /// Highest valid index for the listing that was produced.
        max: i64,
    },

    /// The picked file exists, but no direct download URL was observed in
    /// the folder's network traffic.
    #[error(
        "found the file, but no direct download URL was observed in the folder's network traffic"
    )]
    NoDirectUrl,

    /// The origin answered a stream request with a non-success status.
    #[error("upstream returned {status}")]
    Upstream {
        /// The upstream HTTP status code, surfaced verbatim.
        status: u16,
    },

    /// An unexpected failure during crawling or resolving.
    #[error("{message}")]
    Server {
        /// Description of the underlying failure.
        message: String,
    },
}

impl ServiceError {
    /// Creates a server error from any displayable failure.
    pub fn server(message: impl ToString) -> Self {
        Self::Server {
            message: message.to_string(),
        }
    }

    /// Machine-readable wire code for the `error` field of failure bodies.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingUrl => "MISSING_URL",
            Self::MissingCookie => "MISSING_COOKIE",
            Self::NoFilesFound => "NO_FILES_FOUND",
            Self::BadPick { .. } => "BAD_PICK",
            Self::NoDirectUrl => "NO_DIRECT_URL",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::Server { .. } => "SERVER_ERROR",
        }
    }

    /// HTTP status for the failure response.
    ///
    /// Validation faults are 4xx; expected best-effort outcomes ship as 200
    /// with `ok: false`; upstream failures mirror the upstream status.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::MissingUrl | Self::MissingCookie => 400,
            Self::NoFilesFound | Self::BadPick { .. } | Self::NoDirectUrl => 200,
            Self::Upstream { status } => *status,
            Self::Server { .. } => 500,
        }
    }
}

impl From<CrawlError> for ServiceError {
    fn from(error: CrawlError) -> Self {
        Self::server(error)
    }
}

impl From<ProbeError> for ServiceError {
    fn from(error: ProbeError) -> Self {
        Self::server(error)
    }
}

impl From<StreamError> for ServiceError {
    fn from(error: StreamError) -> Self {
        match error {
            StreamError::UpstreamStatus { status, .. } => Self::Upstream { status },
            StreamError::Network { .. } => Self::server(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_wire_contract() {
        assert_eq!(ServiceError::MissingUrl.code(), "MISSING_URL");
        assert_eq!(ServiceError::MissingCookie.code(), "MISSING_COOKIE");
        assert_eq!(ServiceError::NoFilesFound.code(), "NO_FILES_FOUND");
        assert_eq!(ServiceError::BadPick { max: 2 }.code(), "BAD_PICK");
        assert_eq!(ServiceError::NoDirectUrl.code(), "NO_DIRECT_URL");
        assert_eq!(ServiceError::Upstream { status: 404 }.code(), "UPSTREAM_ERROR");
        assert_eq!(
            ServiceError::server("browser crashed").code(),
            "SERVER_ERROR"
        );
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ServiceError::MissingUrl.http_status(), 400);
        assert_eq!(ServiceError::MissingCookie.http_status(), 400);
        assert_eq!(ServiceError::NoFilesFound.http_status(), 200);
        assert_eq!(ServiceError::BadPick { max: 0 }.http_status(), 200);
        assert_eq!(ServiceError::NoDirectUrl.http_status(), 200);
        assert_eq!(ServiceError::Upstream { status: 429 }.http_status(), 429);
        assert_eq!(ServiceError::server("boom").http_status(), 500);
    }

    #[test]
    fn test_bad_pick_message_names_valid_range() {
        let error = ServiceError::BadPick { max: 2 };
        assert_eq!(error.to_string(), "pick must be between 0 and 2");
    }

    #[test]
    fn test_stream_upstream_error_keeps_status() {
        let error: ServiceError =
            StreamError::upstream_status("https://example.com/f", 403).into();
        assert!(matches!(error, ServiceError::Upstream { status: 403 }));
    }

    #[test]
    fn test_crawl_error_becomes_server_error() {
        let error: ServiceError = CrawlError::task("worker panicked").into();
        assert_eq!(error.code(), "SERVER_ERROR");
        assert!(error.to_string().contains("worker panicked"));
    }
}
