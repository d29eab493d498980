//! HTTP backend: fetches the manifest and node fragments over plain HTTP.
//!
//! One pooled hyper client is shared by every request. Each request runs
//! under the configured timeout so a stalled server surfaces as
//! [`FetchError::Timeout`] rather than a spinner that never ends.

use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::header::ACCEPT;
use hyper::{Request, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use nav_core::config::ServerConfig;
use nav_core::{Backend, FetchError};
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid server url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Clone)]
pub struct HttpBackend {
    client: Client<HttpConnector, Empty<Bytes>>,
    manifest_url: Url,
    fragment_base: Url,
    timeout: Duration,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("manifest_url", &self.manifest_url.as_str())
            .field("fragment_base", &self.fragment_base.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpBackend {
    pub fn new(config: &ServerConfig) -> Result<Self, BackendError> {
        let base = parse_url(&config.base_url)?;
        let manifest_url = join(&base, &config.manifest_path)?;
        // Trailing slash so node urls resolve beneath the prefix.
        let prefix = format!("{}/", config.fragment_prefix.trim_end_matches('/'));
        let fragment_base = join(&base, &prefix)?;

        Ok(Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            manifest_url,
            fragment_base,
            timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn manifest_url(&self) -> &Url {
        &self.manifest_url
    }

    /// Absolute url of the fragment for `node_url`, e.g.
    /// `http://host/tree/DisplayData/Table`. Each `/`-separated segment is
    /// percent-encoded on its own, so `:`, `?` and `#` stay in the path.
    pub fn fragment_url(&self, node_url: &str) -> Result<Url, FetchError> {
        let relative = node_url.trim_matches('/');
        let mut url = self.fragment_base.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::Transport {
                url: format!("{}{relative}", self.fragment_base),
                reason: "fragment base cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(relative.split('/'));
        Ok(url)
    }

    async fn get(&self, url: &Url) -> Result<String, FetchError> {
        let shown = url.to_string();
        match tokio::time::timeout(self.timeout, self.get_inner(url)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(url = %shown, timeout = ?self.timeout, "http: request timed out");
                Err(FetchError::Timeout {
                    url: shown,
                    secs: self.timeout.as_secs(),
                })
            }
        }
    }

    async fn get_inner(&self, url: &Url) -> Result<String, FetchError> {
        let shown = url.to_string();
        let transport = |reason: String| FetchError::Transport {
            url: shown.clone(),
            reason,
        };

        let uri = url
            .as_str()
            .parse::<Uri>()
            .map_err(|e| transport(e.to_string()))?;
        let request = Request::get(uri)
            .header(ACCEPT, "application/json, text/html")
            .body(Empty::<Bytes>::new())
            .map_err(|e| transport(e.to_string()))?;

        tracing::debug!(url = %shown, "http: GET");
        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: shown,
                status: status.as_u16(),
            });
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| transport(e.to_string()))?
            .to_bytes();
        String::from_utf8(body.to_vec()).map_err(|_| FetchError::Encoding { url: shown })
    }
}

impl Backend for HttpBackend {
    async fn fetch_manifest(&self) -> Result<String, FetchError> {
        self.get(&self.manifest_url).await
    }

    async fn fetch_fragment(&self, node_url: &str) -> Result<String, FetchError> {
        let url = self.fragment_url(node_url)?;
        self.get(&url).await
    }
}

fn parse_url(raw: &str) -> Result<Url, BackendError> {
    Url::parse(raw).map_err(|source| BackendError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

fn join(base: &Url, path: &str) -> Result<Url, BackendError> {
    base.join(path).map_err(|source| BackendError::InvalidUrl {
        url: format!("{base}{path}"),
        source,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
