//! Folder crawling: browser-driven discovery of a shared folder's file list.
//!
//! The target site renders its file list via client-side JavaScript that
//! issues asynchronous network calls with undocumented, variable response
//! shapes. The crawler drives a real rendering engine to trigger those calls,
//! observes every response the page receives during a bounded settle window,
//! and extracts a deduplicated file list from the JSON bodies it sees.
//!
//! # Architecture
//!
//! - [`FolderLister`] - Async trait the service layer depends on, so tests
//!   can substitute a stub for the real browser
//! - [`BrowserCrawler`] - Headless-browser implementation of the trait
//! - [`FileCollector`] - Order-independent, deduplicating accumulator
//! - [`FileDescriptor`] - The normalized record for one discovered file
//! - [`CrawlError`] - Session/navigation-level failures

mod browser;
mod collector;
mod error;
mod extract;

pub use collector::FileCollector;
pub use error::CrawlError;
pub use extract::{FileDescriptor, descriptor_from_record, record_array};

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::auth::Credentials;

/// How long a crawl session stays open after initial page load so the page's
/// asynchronous folder-listing calls can complete.
pub const DEFAULT_SETTLE_WINDOW: Duration = Duration::from_secs(6);

/// Hard navigation timeout; exceeding it fails the whole crawl.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Safety cap on descriptors returned per crawl (not a pagination cursor).
pub const DEFAULT_MAX_FILES: usize = 200;

/// Tunable parameters for one crawl operation.
///
/// The defaults mirror the behavior of the original deployment; they are
/// plain configuration values, with no adaptive behavior layered on top.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Fixed duration the session remains open after the base document loads.
    pub settle_window: Duration,
    /// Hard timeout for navigation to the folder URL.
    pub navigation_timeout: Duration,
    /// Maximum number of descriptors kept, in first-seen order.
    pub max_files: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            settle_window: DEFAULT_SETTLE_WINDOW,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

/// Trait the service layer uses to obtain folder listings.
///
/// # Object Safety
///
/// This trait uses `async_trait` to support dynamic dispatch via
/// `Arc<dyn FolderLister>`. Rust 2024 native async traits are not
/// object-safe, so `async_trait` is required for the service seam.
#[async_trait]
pub trait FolderLister: Send + Sync {
    /// Produces the deduplicated, capped file list for one folder URL.
    ///
    /// Each call is fully independent: no listing is cached across calls and
    /// no browser session is reused.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError`] when the browser session cannot be set up or
    /// navigation fails; an empty folder is `Ok(vec![])`, not an error.
    async fn list_folder(
        &self,
        folder_url: &str,
        credentials: &Credentials,
    ) -> Result<Vec<FileDescriptor>, CrawlError>;
}

/// Headless-browser [`FolderLister`] implementation.
#[derive(Debug, Clone, Default)]
pub struct BrowserCrawler {
    config: CrawlConfig,
}

impl BrowserCrawler {
    /// Creates a crawler with the given configuration.
    #[must_use]
    pub fn new(config: CrawlConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl FolderLister for BrowserCrawler {
    #[instrument(level = "debug", skip(self, credentials), fields(url = %folder_url))]
    async fn list_folder(
        &self,
        folder_url: &str,
        credentials: &Credentials,
    ) -> Result<Vec<FileDescriptor>, CrawlError> {
        let url = folder_url.to_string();
        let cookies = credentials.session_cookies(folder_url);
        let config = self.config.clone();

        // The browser protocol client is blocking; keep it off the async
        // runtime's worker threads.
        let files =
            tokio::task::spawn_blocking(move || browser::crawl_folder(&url, &cookies, &config))
                .await
                .map_err(|error| CrawlError::task(error))??;

        info!(url = %folder_url, files = files.len(), "folder crawl complete");
        Ok(files)
    }
}
