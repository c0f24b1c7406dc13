//! Headless-browser session driving for folder crawls.
//!
//! The file list is not obtainable from the folder URL's raw HTML: it is
//! populated by asynchronous calls the page issues after load. This module
//! reproduces exactly the requests a human visitor's browser would make,
//! observing every network response the rendering engine receives and
//! handing JSON bodies to the heuristic extractor as they arrive.

use std::ffi::OsStr;
use std::sync::{Arc, Mutex, PoisonError};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use headless_chrome::protocol::cdp::Network::{CookieParam, GetResponseBodyReturnObject};
use headless_chrome::{Browser, LaunchOptions};
use serde_json::Value;
use tracing::debug;

use crate::auth::SessionCookie;

use super::CrawlConfig;
use super::collector::FileCollector;
use super::error::CrawlError;
use super::extract::FileDescriptor;

/// Crawls one folder page inside an isolated, non-persistent browser session.
///
/// Blocking: runs on a dedicated thread via `spawn_blocking`. The browser
/// process is torn down when `browser` drops, on every exit path including
/// navigation failures.
pub(super) fn crawl_folder(
    folder_url: &str,
    cookies: &[SessionCookie],
    config: &CrawlConfig,
) -> Result<Vec<FileDescriptor>, CrawlError> {
    let launch_options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(false)
        .args(vec![OsStr::new("--disable-dev-shm-usage")])
        .idle_browser_timeout(config.navigation_timeout)
        .build()
        .map_err(|error| CrawlError::session(folder_url, error))?;

    let browser =
        Browser::new(launch_options).map_err(|error| CrawlError::session(folder_url, error))?;
    let tab = browser
        .new_tab()
        .map_err(|error| CrawlError::session(folder_url, error))?;
    tab.set_default_timeout(config.navigation_timeout);
    tab.set_cookies(cookie_params(cookies))
        .map_err(|error| CrawlError::session(folder_url, error))?;

    let collector = Arc::new(Mutex::new(FileCollector::new(config.max_files)));
    let sink = Arc::clone(&collector);
    tab.register_response_handling(
        "folder-listing",
        Box::new(move |params, fetch_body| {
            observe_response(
                &sink,
                &params.response.url,
                &params.response.mime_type,
                fetch_body,
            );
        }),
    )
    .map_err(|error| CrawlError::session(folder_url, error))?;

    // Wait only for the base document: the page's own polling/analytics
    // traffic may never quiesce, so network idle is not a usable signal.
    tab.navigate_to(folder_url)
        .map_err(|error| CrawlError::navigation(folder_url, error))?;
    tab.wait_until_navigated()
        .map_err(|error| CrawlError::navigation(folder_url, error))?;

    // Fixed settle window, not a completion signal: listing calls that the
    // page issues beyond it are missed.
    std::thread::sleep(config.settle_window);

    let files = {
        let mut guard = collector.lock().unwrap_or_else(PoisonError::into_inner);
        guard.take_files()
    };
    debug!(url = %folder_url, files = files.len(), "crawl settled");
    Ok(files)
}

/// Maps session cookies to CDP cookie parameters for the tab's jar.
fn cookie_params(cookies: &[SessionCookie]) -> Vec<CookieParam> {
    cookies
        .iter()
        .map(|cookie| CookieParam {
            name: cookie.name.clone(),
            value: cookie.value().to_string(),
            url: None,
            domain: Some(cookie.domain.clone()),
            path: Some(cookie.path.clone()),
            secure: None,
            http_only: None,
            same_site: None,
            expires: None,
            priority: None,
            same_party: None,
            source_scheme: None,
            source_port: None,
            partition_key: None,
        })
        .collect()
}

/// Handles one intercepted network response.
///
/// Failures here are swallowed at response granularity: a body that cannot
/// be fetched or parsed contributes nothing and must never abort the crawl.
fn observe_response(
    collector: &Mutex<FileCollector>,
    url: &str,
    mime_type: &str,
    fetch_body: &dyn Fn() -> Result<GetResponseBodyReturnObject, anyhow::Error>,
) {
    if !mime_type.contains("application/json") {
        return;
    }

    let body = match fetch_body() {
        Ok(body) => body,
        Err(error) => {
            debug!(url = %url, error = %error, "skipping response whose body could not be fetched");
            return;
        }
    };

    let Some(value) = decode_json_body(&body) else {
        debug!(url = %url, "skipping response that did not decode as JSON");
        return;
    };

    let mut guard = collector.lock().unwrap_or_else(PoisonError::into_inner);
    let added = guard.ingest(&value);
    if added > 0 {
        debug!(url = %url, added, total = guard.len(), "extracted file records");
    }
}

/// Decodes a CDP response body, which may arrive base64-encoded.
fn decode_json_body(body: &GetResponseBodyReturnObject) -> Option<Value> {
    if body.base_64_encoded {
        let raw = BASE64_STANDARD.decode(body.body.as_bytes()).ok()?;
        serde_json::from_slice(&raw).ok()
    } else {
        serde_json::from_str(&body.body).ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::credential_entries;

    #[test]
    fn test_cookie_params_map_name_value_domain_path() {
        let cookies = credential_entries("ndus=tok; lang=en", "https://www.example.com/s/1");
        let params = cookie_params(&cookies);
        assert_eq!(params.len(), 4);
        assert_eq!(params[0].name, "ndus");
        assert_eq!(params[0].value, "tok");
        assert_eq!(params[0].domain.as_deref(), Some("www.example.com"));
        assert_eq!(params[0].path.as_deref(), Some("/"));
        assert_eq!(params[2].domain.as_deref(), Some(".www.example.com"));
    }

    #[test]
    fn test_decode_json_body_plain_text() {
        let body = GetResponseBodyReturnObject {
            body: r#"{"list": []}"#.to_string(),
            base_64_encoded: false,
        };
        assert!(decode_json_body(&body).is_some());
    }

    #[test]
    fn test_decode_json_body_base64() {
        let body = GetResponseBodyReturnObject {
            body: BASE64_STANDARD.encode(r#"{"list": [{"name": "a"}]}"#),
            base_64_encoded: true,
        };
        let value = decode_json_body(&body).unwrap();
        assert_eq!(value["list"][0]["name"], "a");
    }

    #[test]
    fn test_decode_json_body_invalid_json_is_none() {
        let body = GetResponseBodyReturnObject {
            body: "<html></html>".to_string(),
            base_64_encoded: false,
        };
        assert!(decode_json_body(&body).is_none());
    }

    #[test]
    fn test_observe_response_ignores_non_json_mime() {
        let collector = Mutex::new(FileCollector::new(10));
        let mut fetch = || -> Result<GetResponseBodyReturnObject, anyhow::Error> {
            panic!("body must not be fetched for non-JSON responses");
        };
        observe_response(&collector, "https://o/app.js", "text/javascript", &mut fetch);
        assert!(collector.lock().unwrap().is_empty());
    }

    #[test]
    fn test_observe_response_swallows_body_fetch_failure() {
        let collector = Mutex::new(FileCollector::new(10));
        let mut fetch = || -> Result<GetResponseBodyReturnObject, anyhow::Error> {
            Err(anyhow::anyhow!("body evicted"))
        };
        observe_response(&collector, "https://o/list", "application/json", &mut fetch);
        assert!(collector.lock().unwrap().is_empty());
    }

    #[test]
    fn test_observe_response_accumulates_records() {
        let collector = Mutex::new(FileCollector::new(10));
        let mut fetch = || -> Result<GetResponseBodyReturnObject, anyhow::Error> {
            Ok(GetResponseBodyReturnObject {
                body: r#"{"list": [{"name": "a.txt", "fs_id": 7}]}"#.to_string(),
                base_64_encoded: false,
            })
        };
        observe_response(&collector, "https://o/list", "application/json", &mut fetch);
        assert_eq!(collector.lock().unwrap().len(), 1);
    }
}
