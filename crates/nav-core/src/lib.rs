//! nav-core: navigation model for dsk-nav.
//!
//! This crate owns every piece of state the navigator has: the node tree
//! built from the backend manifest, the fuzzy search index over it, the
//! filter pass that decides which nodes stay visible, and the session that
//! keeps location, history, and the loaded content fragment consistent.
//!
//! # Architecture
//!
//! ```text
//! manifest ──► Tree ──► flatten ──► SearchIndex
//!                │                      │
//!  query ────────┴──── filtered_by ◄────┘
//!                │
//!                └──► render_nav ──► UI
//!
//! NavActivated ──► Session ──► Effect::FetchFragment ──► Backend
//!                     ▲                                     │
//!                     └──────── Event::FragmentLoaded ◄─────┘
//! ```
//!
//! Nothing in this crate performs I/O on its own. The [`Backend`] trait is
//! the seam to the network; the session only ever returns [`Effect`]s for a
//! runner to execute.

pub mod config;
pub mod error;
pub mod filter;
pub mod fragment;
pub mod history;
pub mod location;
pub mod manifest;
pub mod node;
pub mod render;
pub mod search;
pub mod session;
pub mod tree;

pub use error::{FetchError, NavError};
pub use fragment::Fragment;
pub use history::History;
pub use location::Location;
pub use node::{Node, NodeId, NodeMeta};
pub use render::{outline, render_nav, NavEntry};
pub use search::{SearchHit, SearchIndex};
pub use session::{ContentStatus, Effect, Event, NavStatus, RequestId, Session};
pub use tree::Tree;

use std::future::Future;

/// Source of the manifest and the content fragments.
///
/// Implemented over HTTP by `nav-backend`; tests implement it with canned
/// strings.
pub trait Backend: Send + Sync + 'static {
    /// Fetch the raw manifest document.
    fn fetch_manifest(&self) -> impl Future<Output = Result<String, FetchError>> + Send;

    /// Fetch the HTML fragment for the node with the given url.
    fn fetch_fragment(
        &self,
        node_url: &str,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}
