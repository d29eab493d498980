//! Node model: one page or section of the documentation tree.
//!
//! Nodes live in the [`Tree`](crate::Tree) arena and refer to each other by
//! [`NodeId`]. A node exclusively owns the ids of its children; the parent id
//! is a back-reference used by the filter pass to walk ancestry.

use serde::Serialize;

/// Index of a node inside its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Search metadata attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeMeta {
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<NodeId>,
    /// Child ids in manifest order.
    pub(crate) children: Vec<NodeId>,
    /// Display label.
    pub title: String,
    /// Canonical path identifying the node and its content fragment, without
    /// leading or trailing slashes. The root's url is `/`.
    pub url: String,
    pub meta: NodeMeta,
    pub(crate) keep: bool,
    pub(crate) is_ghost: bool,
}

impl Node {
    pub(crate) fn new(id: NodeId, title: String, url: String, meta: NodeMeta) -> Self {
        Self {
            id,
            parent: None,
            children: Vec::new(),
            title,
            url,
            meta,
            keep: true,
            is_ghost: false,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Key under which this node is stored in its parent: the last url segment.
    pub fn key(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }

    /// Whether the last filter pass kept this node visible.
    pub fn keep(&self) -> bool {
        self.keep
    }

    /// Whether the node is only visible as path context for a deeper match.
    pub fn is_ghost(&self) -> bool {
        self.is_ghost
    }

    pub(crate) fn set_visibility(&mut self, keep: bool, is_ghost: bool) {
        self.keep = keep;
        self.is_ghost = is_ghost;
    }
}

/// Normalize a node url: surrounding slashes are trimmed, and an empty
/// result (or a bare `/`) denotes the root.
pub(crate) fn normalize_url(url: &str) -> String {
    let trimmed = url.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
