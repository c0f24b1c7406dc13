//! Process configuration assembled from environment variables and CLI flags.
//!
//! Configuration is an explicit value threaded into the service at
//! construction time, never a process-wide singleton, so tests can build
//! services with distinct settings per call.

use std::fmt;
use std::time::Duration;

use tracing::warn;

use crate::crawler::CrawlConfig;

/// Default port for the HTTP front door.
pub const DEFAULT_PORT: u16 = 3000;

/// Environment variable holding the server-side session cookie.
pub const COOKIE_ENV: &str = "SHARESTREAM_COOKIE";

/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable overriding the public base URL used in
/// `downloadUrl` links (for deployments behind a reverse proxy).
pub const BASE_URL_ENV: &str = "SHARESTREAM_BASE_URL";

/// Environment variable overriding the crawl settle window, in milliseconds.
pub const SETTLE_MS_ENV: &str = "SHARESTREAM_SETTLE_MS";

/// Environment variable overriding the per-crawl file cap.
pub const MAX_FILES_ENV: &str = "SHARESTREAM_MAX_FILES";

/// Process configuration for the service and its front door.
#[derive(Clone)]
pub struct AppConfig {
    /// Port the front door listens on.
    pub port: u16,
    /// Server-held session cookie; used when requests do not supply one.
    pub cookie: Option<String>,
    /// Public base URL for `downloadUrl` links; defaults to the request host.
    pub public_base_url: Option<String>,
    /// Crawl tuning (settle window, navigation timeout, file cap).
    pub crawl: CrawlConfig,
}

// Custom Debug impl that redacts the cookie value.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("cookie", &self.cookie.as_ref().map(|_| "[REDACTED]"))
            .field("public_base_url", &self.public_base_url)
            .field("crawl", &self.crawl)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cookie: None,
            public_base_url: None,
            crawl: CrawlConfig::default(),
        }
    }
}

impl AppConfig {
    /// Builds configuration from the process environment.
    ///
    /// Unparseable numeric values are ignored with a warning rather than
    /// aborting startup.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(port) = parsed_env_var::<u16>(PORT_ENV) {
            config.port = port;
        }
        config.cookie = non_empty_env_var(COOKIE_ENV);
        config.public_base_url = non_empty_env_var(BASE_URL_ENV);
        if let Some(settle_ms) = parsed_env_var::<u64>(SETTLE_MS_ENV) {
            config.crawl.settle_window = Duration::from_millis(settle_ms);
        }
        if let Some(max_files) = parsed_env_var::<usize>(MAX_FILES_ENV) {
            config.crawl.max_files = max_files;
        }

        config
    }
}

/// Reads an environment variable, treating empty values as unset.
fn non_empty_env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Reads and parses an environment variable, warning on parse failure.
fn parsed_env_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = non_empty_env_var(name)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, "ignoring unparseable environment value");
            None
        }
    }
}
