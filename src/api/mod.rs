//! Service operations behind the HTTP front door.
//!
//! Each operation is fully independent: listings are recomputed on every
//! call (never cached), credentials are threaded in per call (never a
//! process-wide singleton), and no state is shared across requests.
//!
//! # Architecture
//!
//! - [`FolderService`] - The three operations: list, resolve, stream
//! - [`ServiceError`] - Structured failures with wire codes
//! - Request/response types mirroring the JSON boundary contracts

mod error;

pub use error::ServiceError;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::auth::Credentials;
use crate::config::AppConfig;
use crate::crawler::{BrowserCrawler, FileDescriptor, FolderLister};
use crate::proxy::{ProxiedStream, StreamProxy};
use crate::resolver::MetadataResolver;

/// Body of `POST /folder`.
#[derive(Clone, Default, Deserialize)]
pub struct FolderRequest {
    /// The shared-folder URL to crawl.
    pub url: Option<String>,
    /// Caller-supplied session cookie; falls back to server configuration.
    pub cookie: Option<String>,
}

// Custom Debug impl that redacts the cookie value.
impl fmt::Debug for FolderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FolderRequest")
            .field("url", &self.url)
            .field("cookie", &self.cookie.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Body of `POST /resolve`.
#[derive(Clone, Default, Deserialize)]
pub struct ResolveRequest {
    /// The shared-folder URL to crawl.
    pub url: Option<String>,
    /// Caller-supplied session cookie; falls back to server configuration.
    pub cookie: Option<String>,
    /// Zero-based index into the recomputed folder listing (default 0).
    pub pick: Option<i64>,
}

// Custom Debug impl that redacts the cookie value.
impl fmt::Debug for ResolveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveRequest")
            .field("url", &self.url)
            .field("cookie", &self.cookie.as_ref().map(|_| "[REDACTED]"))
            .field("pick", &self.pick)
            .finish()
    }
}

/// Success body of `POST /folder`.
#[derive(Debug, Clone, Serialize)]
pub struct FolderListing {
    /// Always `true` on this type; failures use [`ErrorBody`].
    pub ok: bool,
    /// Number of files in the listing.
    pub count: usize,
    /// The discovered files, in first-seen order.
    pub files: Vec<FileDescriptor>,
}

impl FolderListing {
    /// Wraps a non-empty file list.
    #[must_use]
    pub fn new(files: Vec<FileDescriptor>) -> Self {
        Self {
            ok: true,
            count: files.len(),
            files,
        }
    }
}

/// Success body of `POST /resolve`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFile {
    /// Always `true` on this type; failures use [`ErrorBody`].
    pub ok: bool,
    /// Filename from the metadata probe.
    pub name: String,
    /// Byte size, when the origin reported one.
    pub size: Option<u64>,
    /// MIME type, when the origin reported one.
    pub mime: Option<String>,
    /// Same-origin stream-proxy URL encoding the resolved direct URL.
    pub download_url: String,
}

/// Structured failure body shared by every route.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub ok: bool,
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl ErrorBody {
    /// Builds the wire body for a service error.
    #[must_use]
    pub fn from_error(error: &ServiceError) -> Self {
        Self {
            ok: false,
            error: error.code(),
            message: error.to_string(),
        }
    }
}

/// The crawl/resolve/stream operations over injected collaborators.
///
/// Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct FolderService {
    lister: Arc<dyn FolderLister>,
    resolver: MetadataResolver,
    proxy: StreamProxy,
    server_cookie: Option<Credentials>,
}

impl FolderService {
    /// Creates a service over explicit collaborators.
    ///
    /// `server_cookie` is the optionally configured server-held credential;
    /// it is threaded in here rather than read from global state so tests
    /// can inject distinct credentials per service instance.
    #[must_use]
    pub fn new(
        lister: Arc<dyn FolderLister>,
        resolver: MetadataResolver,
        proxy: StreamProxy,
        server_cookie: Option<Credentials>,
    ) -> Self {
        Self {
            lister,
            resolver,
            proxy,
            server_cookie,
        }
    }

    /// Creates the production service: headless-browser crawler plus a
    /// shared HTTP client for probing and streaming.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let client = crate::http::build_client();
        Self::new(
            Arc::new(BrowserCrawler::new(config.crawl.clone())),
            MetadataResolver::new(client.clone()),
            StreamProxy::new(client),
            config.cookie.as_deref().map(Credentials::new),
        )
    }

    /// Resolves the credentials for one request.
    ///
    /// A caller-supplied cookie takes precedence; otherwise the
    /// server-configured cookie is used.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::MissingCookie`] when neither is present.
    pub fn credentials(&self, supplied: Option<&str>) -> Result<Credentials, ServiceError> {
        if let Some(cookie) = supplied.map(str::trim).filter(|cookie| !cookie.is_empty()) {
            return Ok(Credentials::new(cookie));
        }
        self.server_cookie
            .clone()
            .ok_or(ServiceError::MissingCookie)
    }

    /// Crawls a folder URL and returns its non-empty file listing.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NoFilesFound`] when the crawl extracted
    /// nothing, or [`ServiceError::Server`] when the crawl itself failed.
    #[instrument(level = "debug", skip(self, credentials), fields(url = %folder_url))]
    pub async fn list_folder(
        &self,
        folder_url: &str,
        credentials: &Credentials,
    ) -> Result<Vec<FileDescriptor>, ServiceError> {
        let files = self.lister.list_folder(folder_url, credentials).await?;
        if files.is_empty() {
            warn!(url = %folder_url, "crawl extracted no files; origin shape may have changed");
            return Err(ServiceError::NoFilesFound);
        }
        Ok(files)
    }

    /// Recomputes the listing, picks one file by index, and enriches it with
    /// probed metadata and a stream-proxy URL rooted at `stream_base`.
    ///
    /// # Errors
    ///
    /// Propagates listing failures; additionally returns
    /// [`ServiceError::BadPick`] for an index outside `[0, count)`,
    /// [`ServiceError::NoDirectUrl`] when the picked file carries no direct
    /// URL, and [`ServiceError::Server`] when the metadata probe fails.
    #[instrument(level = "debug", skip(self, credentials), fields(url = %folder_url, pick))]
    pub async fn resolve(
        &self,
        folder_url: &str,
        credentials: &Credentials,
        pick: i64,
        stream_base: &str,
    ) -> Result<ResolvedFile, ServiceError> {
        let files = self.list_folder(folder_url, credentials).await?;
        let count = i64::try_from(files.len()).unwrap_or(i64::MAX);

        let index = usize::try_from(pick)
            .ok()
            .filter(|_| pick < count)
            .ok_or(ServiceError::BadPick { max: count - 1 })?;

        let file = &files[index];
        let Some(direct_url) = file.direct_url.as_deref() else {
            return Err(ServiceError::NoDirectUrl);
        };

        let metadata = self.resolver.fetch_metadata(direct_url, credentials).await?;
        Ok(ResolvedFile {
            ok: true,
            name: metadata.name,
            size: metadata.size,
            mime: metadata.mime,
            download_url: stream_url(stream_base, direct_url),
        })
    }

    /// Opens a direct URL for relay to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Upstream`] carrying the origin's status on a
    /// non-success response, or [`ServiceError::Server`] on transport
    /// failure.
    #[instrument(level = "debug", skip(self, credentials), fields(url = %direct_url))]
    pub async fn open_stream(
        &self,
        direct_url: &str,
        credentials: &Credentials,
    ) -> Result<ProxiedStream, ServiceError> {
        Ok(self.proxy.open(direct_url, credentials).await?)
    }
}

/// Builds a same-origin stream-proxy URL encoding a direct URL.
#[must_use]
pub fn stream_url(base: &str, direct_url: &str) -> String {
    format!(
        "{}/stream?url={}",
        base.trim_end_matches('/'),
        urlencoding::encode(direct_url)
    )
}
