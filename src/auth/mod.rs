//! Authentication and cookie management.
//!
//! The origin authorizes both page rendering and direct byte fetches with an
//! opaque session cookie string. This module wraps that string in a
//! [`Credentials`] value (redacted in `Debug` output) and converts it into
//! per-domain browser-jar entries for the crawler.

mod cookies;

pub use cookies::{SessionCookie, credential_entries, guess_domain, split_cookie_pairs};

use std::fmt;

/// An opaque session cookie string used for one crawl/resolve/stream operation.
///
/// Never persisted; the value is redacted in `Debug` output to prevent
/// accidental logging of sensitive session data.
#[derive(Clone)]
pub struct Credentials {
    cookie: String,
}

impl Credentials {
    /// Wraps a raw `name=value; name2=value2` cookie string.
    #[must_use]
    pub fn new(cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
        }
    }

    /// Returns the raw cookie string for use as a `Cookie` request header.
    ///
    /// The value is sensitive — avoid logging the return value.
    #[must_use]
    pub fn header_value(&self) -> &str {
        &self.cookie
    }

    /// Converts the cookie string into browser-jar entries for a folder URL.
    ///
    /// See [`credential_entries`] for the domain-scoping rules.
    #[must_use]
    pub fn session_cookies(&self, folder_url: &str) -> Vec<SessionCookie> {
        credential_entries(&self.cookie, folder_url)
    }
}

// Custom Debug impl that redacts the cookie value.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("cookie", &"[REDACTED]")
            .finish()
    }
}
