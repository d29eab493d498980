//! Error types shared by the navigation layers.

use thiserror::Error;

/// Failure to fetch something from the backend.
///
/// Cloneable so a single failure can be both logged and kept as the
/// visible "failed to load" state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("{url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },
    #[error("{url} returned a body that is not UTF-8")]
    Encoding { url: String },
}

/// Errors raised while building or querying the navigation model.
#[derive(Debug, Error)]
pub enum NavError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("manifest is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("manifest status {status:?}: {message}")]
    ManifestStatus { status: String, message: String },
    #[error("malformed manifest: {0}")]
    Malformed(String),
    #[error("duplicate node url {0:?}")]
    DuplicateUrl(String),
    #[error("node {url:?} has no parent {parent:?} in the manifest")]
    OrphanNode { url: String, parent: String },
}
