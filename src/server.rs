//! Thin HTTP front door over the service operations.
//!
//! Routes, body limits, and status mapping only; all behavior lives in
//! [`crate::api`]. Failures serialize as `{ok: false, error, message}` with
//! the status mapping defined on [`ServiceError`].

use std::net::SocketAddr;

use axum::Json;
use axum::Router;
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::{self, HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::api::{
    ErrorBody, FolderListing, FolderRequest, FolderService, ResolveRequest, ServiceError,
};
use crate::config::AppConfig;
use crate::proxy::ProxiedStream;

/// Maximum accepted JSON request body size (1 MiB).
const JSON_BODY_LIMIT: usize = 1024 * 1024;

/// Request header carrying a caller-supplied cookie on `GET /stream`.
pub const SESSION_COOKIE_HEADER: &str = "x-session-cookie";

/// Shared state behind the routes.
#[derive(Clone)]
pub struct AppState {
    service: FolderService,
    public_base_url: Option<String>,
}

impl AppState {
    /// Creates route state over a service and an optional fixed base URL for
    /// `downloadUrl` links.
    #[must_use]
    pub fn new(service: FolderService, public_base_url: Option<String>) -> Self {
        Self {
            service,
            public_base_url,
        }
    }
}

/// Builds the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/", get(get_index))
        .route("/folder", post(post_folder))
        .route("/resolve", post(post_resolve))
        .route("/stream", get(get_stream))
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .with_state(state)
}

/// Binds the listen port and serves requests until the process exits.
///
/// # Errors
///
/// Returns an error when the port cannot be bound or the server loop fails.
pub async fn serve(config: AppConfig, service: FolderService) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    let app = router(AppState::new(service, config.public_base_url.clone()));
    axum::serve(listener, app).await?;
    Ok(())
}

async fn get_health() -> Json<serde_json::Value> {
    Json(json!({"ok": true}))
}

async fn get_index() -> Json<serde_json::Value> {
    Json(json!({
        "ok": true,
        "message": "shared-folder streaming API",
        "endpoints": {
            "health": "GET /health",
            "folder": "POST /folder { url, cookie? }",
            "resolve": "POST /resolve { url, cookie?, pick? }",
            "stream": "GET /stream?url=..."
        }
    }))
}

async fn post_folder(
    State(state): State<AppState>,
    Json(request): Json<FolderRequest>,
) -> Response {
    let Some(url) = trimmed(request.url.as_deref()) else {
        return failure(&ServiceError::MissingUrl);
    };
    let credentials = match state.service.credentials(request.cookie.as_deref()) {
        Ok(credentials) => credentials,
        Err(error) => return failure(&error),
    };

    match state.service.list_folder(url, &credentials).await {
        Ok(files) => Json(FolderListing::new(files)).into_response(),
        Err(error) => failure(&error),
    }
}

async fn post_resolve(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ResolveRequest>,
) -> Response {
    let Some(url) = trimmed(request.url.as_deref()) else {
        return failure(&ServiceError::MissingUrl);
    };
    let credentials = match state.service.credentials(request.cookie.as_deref()) {
        Ok(credentials) => credentials,
        Err(error) => return failure(&error),
    };

    let pick = request.pick.unwrap_or(0);
    let base = stream_base(&state, &headers);
    match state.service.resolve(url, &credentials, pick, &base).await {
        Ok(resolved) => Json(resolved).into_response(),
        Err(error) => failure(&error),
    }
}

/// Query string of `GET /stream`.
#[derive(Debug, Deserialize)]
struct StreamQuery {
    url: Option<String>,
}

async fn get_stream(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
    headers: HeaderMap,
) -> Response {
    let Some(url) = trimmed(query.url.as_deref()) else {
        return failure(&ServiceError::MissingUrl);
    };
    let supplied = headers
        .get(SESSION_COOKIE_HEADER)
        .and_then(|value| value.to_str().ok());
    let credentials = match state.service.credentials(supplied) {
        Ok(credentials) => credentials,
        Err(error) => return failure(&error),
    };

    match state.service.open_stream(url, &credentials).await {
        Ok(upstream) => stream_response(upstream),
        Err(error) => failure(&error),
    }
}

/// Builds the relayed response: upstream status, the three mirrored headers,
/// and the body streamed through as it arrives.
fn stream_response(upstream: ProxiedStream) -> Response {
    let status = StatusCode::from_u16(upstream.status()).unwrap_or(StatusCode::OK);

    let mut builder = http::Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, upstream.content_type());
    if let Some(length) = upstream.content_length() {
        builder = builder.header(header::CONTENT_LENGTH, length);
    }
    if let Some(disposition) = upstream.content_disposition() {
        builder = builder.header(header::CONTENT_DISPOSITION, disposition);
    }

    match builder.body(Body::from_stream(upstream.into_bytes_stream())) {
        Ok(response) => response,
        Err(build_error) => {
            error!(error = %build_error, "failed to assemble relayed response");
            failure(&ServiceError::server("failed to assemble relayed response"))
        }
    }
}

/// Base URL for `downloadUrl` links: the configured public base when set,
/// else the request's `Host` header.
fn stream_base(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(base) = &state.public_base_url {
        return base.clone();
    }
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}")
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn failure(error: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(error.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorBody::from_error(error))).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::crawler::BrowserCrawler;
    use crate::proxy::StreamProxy;
    use crate::resolver::MetadataResolver;

    fn state(public_base_url: Option<&str>) -> AppState {
        let client = reqwest::Client::new();
        let service = FolderService::new(
            Arc::new(BrowserCrawler::default()),
            MetadataResolver::new(client.clone()),
            StreamProxy::new(client),
            None,
        );
        AppState::new(service, public_base_url.map(std::string::ToString::to_string))
    }

    #[test]
    fn test_stream_base_prefers_configured_public_base() {
        let state = state(Some("https://proxy.example.com"));
        let headers = HeaderMap::new();
        assert_eq!(stream_base(&state, &headers), "https://proxy.example.com");
    }

    #[test]
    fn test_stream_base_falls_back_to_host_header() {
        let state = state(None);
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "files.local:3000".parse().unwrap());
        assert_eq!(stream_base(&state, &headers), "http://files.local:3000");
    }

    #[test]
    fn test_trimmed_rejects_blank_values() {
        assert_eq!(trimmed(Some("  ")), None);
        assert_eq!(trimmed(None), None);
        assert_eq!(trimmed(Some(" x ")), Some("x"));
    }
}
