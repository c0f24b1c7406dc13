//! Error types for the folder crawler.

use thiserror::Error;

/// Errors that can occur while crawling a shared-folder page.
///
/// Per-response extraction failures are not represented here: they are
/// swallowed at response granularity inside the crawl and never abort it.
/// These variants cover session-setup and navigation granularity, which abort
/// the whole operation.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Browser launch, tab creation, or cookie installation failed.
    #[error("browser session error for {url}: {message}")]
    Session {
        /// The folder URL being crawled.
        url: String,
        /// Description of the underlying failure.
        message: String,
    },

    /// Navigation to the folder URL failed or timed out.
    #[error("navigation failed for {url}: {message}")]
    Navigation {
        /// The folder URL being crawled.
        url: String,
        /// Description of the underlying failure.
        message: String,
    },

    /// The blocking crawl task could not be joined (panicked or was cancelled).
    #[error("crawl task failed: {message}")]
    Task {
        /// Description of the join failure.
        message: String,
    },
}

impl CrawlError {
    /// Creates a session error.
    pub fn session(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Session {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Creates a navigation error.
    pub fn navigation(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Navigation {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Creates a task-join error.
    pub fn task(message: impl ToString) -> Self {
        Self::Task {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_error_session_display() {
        let error = CrawlError::session("https://example.com/s/abc", "chrome not found");
        let msg = error.to_string();
        assert!(msg.contains("browser session error"), "got: {msg}");
        assert!(msg.contains("https://example.com/s/abc"), "got: {msg}");
        assert!(msg.contains("chrome not found"), "got: {msg}");
    }

    #[test]
    fn test_crawl_error_navigation_display() {
        let error = CrawlError::navigation("https://example.com/s/abc", "timed out");
        let msg = error.to_string();
        assert!(msg.contains("navigation failed"), "got: {msg}");
        assert!(msg.contains("timed out"), "got: {msg}");
    }
}
