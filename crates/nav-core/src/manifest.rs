//! Manifest parsing: turns the backend's node listing into a nested shape.
//!
//! Two bodies are accepted, optionally wrapped in a JSEND envelope
//! (`{"status": "success", "data": ...}`):
//!
//! - **nested**: `{"root": {"title", "url", "children": [...] | null, "meta": {"keywords": [...]}}}`
//! - **flat**: `{"nodes": [{"title", "url", "keywords": [...]}, ...]}` where
//!   each node's parent is the url with its last segment removed.
//!
//! Whatever the input, [`Manifest::from_json`] either returns a complete
//! nested manifest or an error; it never hands back a partial tree.

use crate::error::NavError;
use crate::node::normalize_url;
use serde::Deserialize;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Document {
    Envelope(Envelope),
    Bare(Body),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    data: Option<Body>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Body {
    Nested { root: RawNode },
    Flat { nodes: Vec<FlatEntry> },
}

#[derive(Debug, Default, Deserialize)]
struct RawMeta {
    #[serde(default)]
    keywords: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    title: String,
    url: String,
    #[serde(default)]
    children: Option<Vec<RawNode>>,
    #[serde(default)]
    meta: Option<RawMeta>,
}

#[derive(Debug, Deserialize)]
struct FlatEntry {
    title: String,
    url: String,
    #[serde(default)]
    keywords: Option<Vec<String>>,
    #[serde(default)]
    meta: Option<RawMeta>,
}

fn keywords_of(direct: Option<Vec<String>>, meta: Option<RawMeta>) -> Vec<String> {
    direct
        .or_else(|| meta.and_then(|m| m.keywords))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Public nested shape
// ---------------------------------------------------------------------------

/// A manifest node with its children, in manifest order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestNode {
    pub title: String,
    /// Normalized url (`/` for the root).
    pub url: String,
    pub keywords: Vec<String>,
    pub children: Vec<ManifestNode>,
}

impl ManifestNode {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: normalize_url(&url.into()),
            keywords: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_children(mut self, children: Vec<ManifestNode>) -> Self {
        self.children = children;
        self
    }

    fn from_raw(raw: RawNode) -> Self {
        Self {
            title: raw.title,
            url: normalize_url(&raw.url),
            keywords: keywords_of(None, raw.meta),
            children: raw
                .children
                .unwrap_or_default()
                .into_iter()
                .map(Self::from_raw)
                .collect(),
        }
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ManifestNode::count).sum::<usize>()
    }
}

/// The parsed node listing, rooted at the (never rendered) root node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub root: ManifestNode,
}

impl Manifest {
    /// Parse a manifest document, accepting every shape described in the
    /// module docs.
    pub fn from_json(src: &str) -> Result<Self, NavError> {
        let doc: Document = serde_json::from_str(src)?;
        let body = match doc {
            Document::Bare(body) => body,
            Document::Envelope(env) => {
                if env.status != "success" {
                    return Err(NavError::ManifestStatus {
                        status: env.status,
                        message: env.message.unwrap_or_default(),
                    });
                }
                env.data.ok_or_else(|| {
                    NavError::Malformed("success envelope without data".to_string())
                })?
            }
        };

        match body {
            Body::Nested { root } => Ok(Self {
                root: ManifestNode::from_raw(root),
            }),
            Body::Flat { nodes } => Self::from_flat(nodes),
        }
    }

    /// Assemble a nested manifest from a flat listing. Parentage is derived
    /// from url paths; listing order is kept among siblings.
    fn from_flat(entries: Vec<FlatEntry>) -> Result<Self, NavError> {
        let mut nodes: Vec<ManifestNode> = Vec::with_capacity(entries.len());
        let mut index: HashMap<String, usize> = HashMap::new();

        for entry in entries {
            let url = normalize_url(&entry.url);
            if index.insert(url.clone(), nodes.len()).is_some() {
                return Err(NavError::DuplicateUrl(url));
            }
            nodes.push(ManifestNode {
                title: entry.title,
                url,
                keywords: keywords_of(entry.keywords, entry.meta),
                children: Vec::new(),
            });
        }

        let root_idx = *index.get("/").ok_or_else(|| {
            NavError::Malformed("flat listing has no root entry (url \"/\")".to_string())
        })?;

        // parent_of[i] = index of the parent of node i (None for the root)
        let mut parent_of: Vec<Option<usize>> = vec![None; nodes.len()];
        for (i, node) in nodes.iter().enumerate() {
            if i == root_idx {
                continue;
            }
            let parent_url = match node.url.rsplit_once('/') {
                Some((parent, _)) => parent.to_string(),
                None => "/".to_string(),
            };
            let parent = index.get(&parent_url).ok_or_else(|| NavError::OrphanNode {
                url: node.url.clone(),
                parent: parent_url.clone(),
            })?;
            parent_of[i] = Some(*parent);
        }

        // Attach deepest nodes first so every child is complete before it is
        // moved into its parent. Url depth strictly increases along a path.
        let depth = |n: &ManifestNode| n.url.matches('/').count();
        let mut order: Vec<usize> = (0..nodes.len()).filter(|&i| i != root_idx).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(depth(&nodes[i])));

        let mut slots: Vec<Option<ManifestNode>> = nodes.into_iter().map(Some).collect();
        let mut pending: Vec<Vec<(usize, ManifestNode)>> = vec![Vec::new(); slots.len()];

        for i in order {
            let mut node = slots[i].take().ok_or_else(|| {
                NavError::Malformed(format!("node at position {i} visited twice"))
            })?;
            let mut children = std::mem::take(&mut pending[i]);
            children.sort_by_key(|(pos, _)| *pos);
            node.children = children.into_iter().map(|(_, c)| c).collect();
            if let Some(parent) = parent_of[i] {
                pending[parent].push((i, node));
            }
        }

        let mut root = slots[root_idx]
            .take()
            .ok_or_else(|| NavError::Malformed("root entry missing".to_string()))?;
        let mut children = std::mem::take(&mut pending[root_idx]);
        children.sort_by_key(|(pos, _)| *pos);
        root.children = children.into_iter().map(|(_, c)| c).collect();

        Ok(Self { root })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_jsend_nested_with_null_children() {
        let src = r#"{
            "status": "success",
            "data": {
                "root": {
                    "title": "design", "url": "/", "parent": null,
                    "children": [
                        {"title": "DisplayData", "url": "DisplayData", "parent": null,
                         "children": [
                            {"title": "Table", "url": "DisplayData/Table", "children": null,
                             "meta": {"keywords": ["grid", "rows"]}}
                         ]}
                    ]
                }
            }
        }"#;
        let manifest = Manifest::from_json(src).unwrap();
        assert_eq!(manifest.root.count(), 3);
        let table = &manifest.root.children[0].children[0];
        assert_eq!(table.url, "DisplayData/Table");
        assert_eq!(table.keywords, vec!["grid", "rows"]);
        assert!(table.children.is_empty());
    }

    #[test]
    fn parses_bare_nested() {
        let src = r#"{"root": {"title": "r", "url": "/", "children": [{"title": "A", "url": "/A/"}]}}"#;
        let manifest = Manifest::from_json(src).unwrap();
        assert_eq!(manifest.root.children[0].url, "A");
    }

    #[test]
    fn flat_listing_keeps_sibling_order() {
        let src = r#"{"nodes": [
            {"title": "root", "url": "/"},
            {"title": "B", "url": "B"},
            {"title": "A", "url": "A", "keywords": ["first"]},
            {"title": "A2", "url": "A/two"},
            {"title": "A1", "url": "A/one"}
        ]}"#;
        let manifest = Manifest::from_json(src).unwrap();
        let titles: Vec<_> = manifest.root.children.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
        let a = &manifest.root.children[1];
        assert_eq!(a.keywords, vec!["first"]);
        let grand: Vec<_> = a.children.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(grand, vec!["A2", "A1"]);
    }

    #[test]
    fn flat_listing_without_root_is_rejected() {
        let src = r#"{"nodes": [{"title": "A", "url": "A"}]}"#;
        assert!(matches!(Manifest::from_json(src), Err(NavError::Malformed(_))));
    }

    #[test]
    fn flat_orphan_is_rejected() {
        let src = r#"{"nodes": [{"title": "r", "url": "/"}, {"title": "x", "url": "missing/x"}]}"#;
        match Manifest::from_json(src) {
            Err(NavError::OrphanNode { url, parent }) => {
                assert_eq!(url, "missing/x");
                assert_eq!(parent, "missing");
            }
            other => panic!("expected orphan error, got {other:?}"),
        }
    }

    #[test]
    fn flat_duplicate_is_rejected() {
        let src = r#"{"nodes": [{"title": "r", "url": "/"}, {"title": "a", "url": "a"}, {"title": "a'", "url": "/a/"}]}"#;
        assert!(matches!(Manifest::from_json(src), Err(NavError::DuplicateUrl(u)) if u == "a"));
    }

    #[test]
    fn failed_envelope_surfaces_message() {
        let src = r#"{"status": "error", "message": "failed to walk directory tree"}"#;
        match Manifest::from_json(src) {
            Err(NavError::ManifestStatus { status, message }) => {
                assert_eq!(status, "error");
                assert_eq!(message, "failed to walk directory tree");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(Manifest::from_json("not json"), Err(NavError::Json(_))));
        assert!(Manifest::from_json(r#"{"something": "else"}"#).is_err());
    }
}
