//! Shared HTTP client construction for probe and stream traffic.

use std::time::Duration;

use reqwest::Client;

use crate::user_agent;

/// Connection timeout for upstream requests.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Builds the HTTP client shared by the metadata resolver and stream proxy.
///
/// Redirects are followed (default policy). No overall request timeout is
/// set: relayed streams may legitimately run for a long time. Response
/// bodies are never transparently decompressed, so `Content-Length` and the
/// byte stream reach the caller exactly as the origin sent them.
///
/// # Panics
///
/// Panics if the HTTP client builder fails to build with the static
/// configuration. This should never happen in practice.
#[must_use]
#[allow(clippy::expect_used)]
pub(crate) fn build_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .user_agent(user_agent::default_user_agent())
        .build()
        .expect("failed to build HTTP client with static configuration")
}
