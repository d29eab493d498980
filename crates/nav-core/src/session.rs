//! Session: the navigator's application state and its single dispatch point.
//!
//! Every user action and every completed fetch is an [`Event`]. The session
//! applies it and returns the [`Effect`]s (fetches) the runner must perform;
//! their results come back as further events. The session never does I/O and
//! is only ever mutated by one caller, so no locking is involved.
//!
//! # Ordering
//!
//! ```text
//! new() ──► SyncTree ──► TreeSynced ──► index build ──► filter (current query)
//!      └──► FetchFragment (initial path)           (queries before this only
//!                                                    update the location)
//! ```
//!
//! Searching and content loading are independent: a query change never
//! reloads content, and a pending fragment never blocks a search.

use crate::config::SearchConfig;
use crate::error::{FetchError, NavError};
use crate::fragment::Fragment;
use crate::history::History;
use crate::location::Location;
use crate::render::{render_nav, NavEntry};
use crate::search::SearchIndex;
use crate::tree::Tree;

/// Identifies one fragment request so late responses can be recognised.
pub type RequestId = u64;

/// Why a fragment is being loaded; decides what happens to history on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Startup with a non-root location; history already holds it.
    Initial,
    /// Link activation; a new history entry is pushed on success.
    Push,
    /// Back/forward; history has already moved.
    Traverse,
}

#[derive(Debug)]
pub enum Event {
    /// The manifest fetch and tree build finished.
    TreeSynced(Result<Tree, NavError>),
    /// The search text changed.
    QueryChanged(String),
    ClearSearch,
    /// A keyword in the loaded content was activated.
    KeywordClicked(String),
    /// A nav link (its `href`) was activated.
    NavActivated(String),
    FragmentLoaded {
        request: RequestId,
        result: Result<String, FetchError>,
    },
    HistoryBack,
    HistoryForward,
    /// Retry the manifest after a failed sync.
    Reload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SyncTree,
    FetchFragment { request: RequestId, node_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavStatus {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentStatus {
    Idle,
    Loading { node_url: String },
    Failed { node_url: String, reason: String },
}

#[derive(Debug)]
struct PendingLoad {
    request: RequestId,
    node_url: String,
    mode: LoadMode,
}

#[derive(Debug)]
pub struct Session {
    search_config: SearchConfig,
    fragment_prefix: String,
    location: Location,
    history: History,
    tree: Option<Tree>,
    index: Option<SearchIndex>,
    nav: Vec<NavEntry>,
    nav_status: NavStatus,
    match_count: Option<usize>,
    content: Option<Fragment>,
    content_status: ContentStatus,
    pending: Option<PendingLoad>,
    next_request: RequestId,
}

impl Session {
    /// Start a session at `location`. Returns the startup effects: the tree
    /// sync and, for a non-root location, the matching fragment.
    pub fn new(
        location: Location,
        search_config: SearchConfig,
        fragment_prefix: impl Into<String>,
    ) -> (Self, Vec<Effect>) {
        let mut session = Self {
            search_config,
            fragment_prefix: fragment_prefix.into(),
            history: History::new(location.clone()),
            location,
            tree: None,
            index: None,
            nav: Vec::new(),
            nav_status: NavStatus::Loading,
            match_count: None,
            content: None,
            content_status: ContentStatus::Idle,
            pending: None,
            next_request: 1,
        };

        let mut effects = vec![Effect::SyncTree];
        if let Some(node_url) = session.location.node_url().map(str::to_string) {
            effects.push(session.start_load(node_url, LoadMode::Initial));
        }
        tracing::info!(location = %session.location, "session: started");
        (session, effects)
    }

    pub fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::TreeSynced(Ok(tree)) => {
                if self.nav_status == NavStatus::Ready {
                    tracing::warn!("session: tree already synced, ignoring rebuild");
                    return Vec::new();
                }
                self.index = Some(SearchIndex::build(&tree, self.search_config.clone()));
                self.tree = Some(tree);
                self.nav_status = NavStatus::Ready;
                self.apply_query();
                Vec::new()
            }
            Event::TreeSynced(Err(err)) => {
                tracing::error!(error = %err, "session: tree sync failed");
                self.nav_status = NavStatus::Failed(err.to_string());
                Vec::new()
            }
            Event::QueryChanged(query) => {
                self.set_query(query);
                Vec::new()
            }
            Event::ClearSearch => {
                self.set_query(String::new());
                Vec::new()
            }
            Event::KeywordClicked(keyword) => {
                tracing::debug!(keyword = %keyword, "session: keyword search");
                self.set_query(keyword);
                Vec::new()
            }
            Event::NavActivated(href) => {
                let target = Location::from_link(&href, &self.fragment_prefix, "");
                match target.node_url().map(str::to_string) {
                    Some(node_url) => vec![self.start_load(node_url, LoadMode::Push)],
                    None => {
                        tracing::debug!(href = %href, "session: link to site root ignored");
                        Vec::new()
                    }
                }
            }
            Event::FragmentLoaded { request, result } => {
                self.finish_load(request, result);
                Vec::new()
            }
            Event::HistoryBack => {
                let target = self.history.back().cloned();
                self.traverse(target)
            }
            Event::HistoryForward => {
                let target = self.history.forward().cloned();
                self.traverse(target)
            }
            Event::Reload => match self.nav_status {
                NavStatus::Failed(_) => {
                    self.nav_status = NavStatus::Loading;
                    vec![Effect::SyncTree]
                }
                _ => Vec::new(),
            },
        }
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    fn set_query(&mut self, query: String) {
        self.location.set_query(query);
        self.history.replace(self.location.clone());
        self.apply_query();
    }

    /// Re-filter the tree with the current query. Before the tree is synced
    /// there is nothing to filter; the query is applied once it arrives.
    fn apply_query(&mut self) {
        let (Some(tree), Some(index)) = (self.tree.as_mut(), self.index.as_mut()) else {
            return;
        };
        let query = self.location.query();
        let hits = index.search(query);
        self.match_count = (!query.trim().is_empty()).then_some(hits.len());
        tree.filtered_by(&hits);
        self.nav = render_nav(tree, &self.fragment_prefix);
        tracing::debug!(query = %query, hits = hits.len(), "session: nav re-rendered");
    }

    // -----------------------------------------------------------------------
    // Content
    // -----------------------------------------------------------------------

    fn start_load(&mut self, node_url: String, mode: LoadMode) -> Effect {
        let request = self.next_request;
        self.next_request += 1;
        if let Some(prev) = &self.pending {
            tracing::debug!(
                superseded = prev.request,
                request,
                "session: fragment load superseded"
            );
        }
        self.pending = Some(PendingLoad {
            request,
            node_url: node_url.clone(),
            mode,
        });
        self.content_status = ContentStatus::Loading {
            node_url: node_url.clone(),
        };
        tracing::debug!(request, node = %node_url, ?mode, "session: fragment requested");
        Effect::FetchFragment { request, node_url }
    }

    fn finish_load(&mut self, request: RequestId, result: Result<String, FetchError>) {
        let Some(pending) = self.pending.take_if(|p| p.request == request) else {
            tracing::debug!(request, "session: stale fragment response dropped");
            return;
        };

        match result {
            Ok(html) => {
                if pending.mode == LoadMode::Push {
                    let location = Location::for_node(&pending.node_url, self.location.query());
                    self.history.push(location.clone());
                    self.location = location;
                }
                self.content = Some(Fragment::parse(pending.node_url, html));
                self.content_status = ContentStatus::Idle;
            }
            Err(err) => {
                tracing::warn!(
                    node = %pending.node_url,
                    error = %err,
                    "session: fragment load failed"
                );
                self.content_status = ContentStatus::Failed {
                    node_url: pending.node_url,
                    reason: err.to_string(),
                };
            }
        }
    }

    fn traverse(&mut self, target: Option<Location>) -> Vec<Effect> {
        let Some(target) = target else {
            return Vec::new();
        };
        tracing::debug!(location = %target, "session: history traversal");
        self.location = target;
        self.apply_query();

        let shown = self.content.as_ref().map(|f| f.node_url.as_str());
        match self.location.node_url().map(str::to_string) {
            Some(node_url) if shown != Some(node_url.as_str()) => {
                vec![self.start_load(node_url, LoadMode::Traverse)]
            }
            Some(_) => {
                // Already showing it; drop any load headed elsewhere.
                self.pending = None;
                self.content_status = ContentStatus::Idle;
                Vec::new()
            }
            None => {
                self.pending = None;
                self.content = None;
                self.content_status = ContentStatus::Idle;
                Vec::new()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn query(&self) -> &str {
        self.location.query()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    /// The rendered navigation. Empty until the tree is synced.
    pub fn nav(&self) -> &[NavEntry] {
        &self.nav
    }

    pub fn nav_status(&self) -> &NavStatus {
        &self.nav_status
    }

    /// Number of search hits for the active query, `None` when no query is
    /// active or the tree is not synced yet.
    pub fn match_count(&self) -> Option<usize> {
        self.match_count
    }

    pub fn content(&self) -> Option<&Fragment> {
        self.content.as_ref()
    }

    pub fn content_status(&self) -> &ContentStatus {
        &self.content_status
    }

    pub fn fragment_prefix(&self) -> &str {
        &self.fragment_prefix
    }

    /// Breadcrumb titles for the loaded content, root excluded.
    pub fn crumbs(&self) -> Vec<String> {
        match (&self.tree, &self.content) {
            (Some(tree), Some(fragment)) => tree
                .crumbs(&fragment.node_url)
                .into_iter()
                .map(|(_, title)| title)
                .collect(),
            _ => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
