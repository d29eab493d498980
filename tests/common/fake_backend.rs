//! Fake documentation server for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `GET /api/tree`: the configured manifest
//! - `GET /tree/{*path}`: the configured fragment for `path`
//!
//! Either route can be made to fail with a status code or to answer late,
//! and every request is counted so tests can assert what was fetched.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn demo() {
//! let server = FakeBackend::start_site().await;
//! server.fail("Inputs/Button", 500).await;
//! let backend = server.http_backend();
//! # }
//! ```

use super::fixtures::{pages, MANIFEST_NESTED};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use nav_backend::HttpBackend;
use nav_core::config::ServerConfig;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// Key under which the manifest route's failures, delays, and hits are kept.
pub const MANIFEST_KEY: &str = "@manifest";

#[derive(Default)]
struct SiteState {
    manifest: String,
    pages: HashMap<String, String>,
    failures: HashMap<String, u16>,
    delays: HashMap<String, Duration>,
    hits: HashMap<String, usize>,
}

/// Handle to the running fake server.
pub struct FakeBackend {
    addr: SocketAddr,
    state: Arc<Mutex<SiteState>>,
}

impl FakeBackend {
    /// Start a server with the given manifest and no pages.
    pub async fn start(manifest: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend address");
        let state = Arc::new(Mutex::new(SiteState {
            manifest: manifest.to_string(),
            ..Default::default()
        }));

        let app = Router::new()
            .route("/api/tree", get(manifest_route))
            .route("/tree/{*path}", get(page_route))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Start a server serving the fixture site with every page.
    pub async fn start_site() -> Self {
        let server = Self::start(MANIFEST_NESTED).await;
        for (url, html) in pages() {
            server.set_page(url, html).await;
        }
        server
    }

    /// Base URL (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            base_url: self.base_url(),
            ..ServerConfig::default()
        }
    }

    pub fn http_backend(&self) -> HttpBackend {
        HttpBackend::new(&self.server_config()).expect("fake backend url is valid")
    }

    pub async fn set_page(&self, url: &str, html: impl Into<String>) {
        self.state.lock().await.pages.insert(url.to_string(), html.into());
    }

    /// Answer requests for `key` (a node url or [`MANIFEST_KEY`]) with `status`.
    pub async fn fail(&self, key: &str, status: u16) {
        self.state.lock().await.failures.insert(key.to_string(), status);
    }

    /// Undo [`FakeBackend::fail`].
    pub async fn heal(&self, key: &str) {
        self.state.lock().await.failures.remove(key);
    }

    /// Hold the response for `key` for `delay`.
    pub async fn delay(&self, key: &str, delay: Duration) {
        self.state.lock().await.delays.insert(key.to_string(), delay);
    }

    /// Number of requests served for `key`.
    pub async fn hits(&self, key: &str) -> usize {
        self.state.lock().await.hits.get(key).copied().unwrap_or(0)
    }
}

async fn respond(state: &Mutex<SiteState>, key: &str) -> Response {
    let (delay, failure, body) = {
        let mut s = state.lock().await;
        *s.hits.entry(key.to_string()).or_default() += 1;
        let body = if key == MANIFEST_KEY {
            Some(s.manifest.clone())
        } else {
            s.pages.get(key).cloned()
        };
        (s.delays.get(key).copied(), s.failures.get(key).copied(), body)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(status) = failure {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, "failure requested by test").into_response();
    }
    match body {
        Some(body) => body.into_response(),
        None => (StatusCode::NOT_FOUND, format!("no page {key}")).into_response(),
    }
}

async fn manifest_route(State(state): State<Arc<Mutex<SiteState>>>) -> Response {
    respond(&state, MANIFEST_KEY).await
}

async fn page_route(
    State(state): State<Arc<Mutex<SiteState>>>,
    Path(path): Path<String>,
) -> Response {
    respond(&state, &path).await
}
