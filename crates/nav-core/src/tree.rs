//! Tree: the canonical hierarchical view of every navigable node.
//!
//! The tree is an arena: its node vector owns every [`Node`], the root sits
//! at index 0, and nodes refer to one another by [`NodeId`]. It is built once
//! per session by [`Tree::sync`]; afterwards only the transient `keep` /
//! `is_ghost` flags change, through [`Tree::filtered_by`].

use crate::error::NavError;
use crate::filter;
use crate::manifest::{Manifest, ManifestNode};
use crate::node::{Node, NodeId, NodeMeta};
use crate::search::SearchHit;
use crate::Backend;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    by_url: HashMap<String, NodeId>,
}

impl Tree {
    /// Fetch the manifest from `backend` and build the tree from it.
    ///
    /// Fails when the fetch fails or the manifest is malformed; no partial
    /// tree is ever produced.
    pub async fn sync<B: Backend>(backend: &B) -> Result<Self, NavError> {
        let body = backend.fetch_manifest().await?;
        let manifest = Manifest::from_json(&body)?;
        let tree = Self::from_manifest(manifest)?;
        tracing::info!(nodes = tree.len(), "tree: synced");
        Ok(tree)
    }

    /// Build the arena from a parsed manifest, rejecting duplicate and empty
    /// urls.
    pub fn from_manifest(manifest: Manifest) -> Result<Self, NavError> {
        let mut tree = Tree {
            nodes: Vec::with_capacity(manifest.root.count()),
            by_url: HashMap::new(),
        };
        tree.insert(manifest.root, None)?;
        Ok(tree)
    }

    fn insert(&mut self, src: ManifestNode, parent: Option<NodeId>) -> Result<NodeId, NavError> {
        if parent.is_some() && src.url == "/" {
            return Err(NavError::Malformed(format!(
                "node {:?} under the root has an empty url",
                src.title
            )));
        }
        if self.by_url.contains_key(&src.url) {
            return Err(NavError::DuplicateUrl(src.url));
        }

        let id = NodeId(self.nodes.len());
        let mut node = Node::new(
            id,
            src.title,
            src.url.clone(),
            NodeMeta {
                keywords: src.keywords,
            },
        );
        node.parent = parent;
        self.nodes.push(node);
        self.by_url.insert(src.url, id);

        for child in src.children {
            let child_id = self.insert(child, Some(id))?;
            self.nodes[id.0].children.push(child_id);
        }
        Ok(id)
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find_by_url(&self, url: &str) -> Option<&Node> {
        self.by_url
            .get(&crate::node::normalize_url(url))
            .and_then(|id| self.get(*id))
    }

    /// Child of `id` stored under `key` (the child's last url segment).
    pub fn child(&self, id: NodeId, key: &str) -> Option<&Node> {
        self.get(id)?
            .children
            .iter()
            .filter_map(|c| self.get(*c))
            .find(|c| c.key() == key)
    }

    /// Every node, root included, in pre-order.
    pub fn flatten(&self) -> Vec<&Node> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root_id()];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            out.push(node);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Strict ancestors of `id`, nearest first, root excluded.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.get(id).and_then(|n| n.parent);
        while let Some(pid) = cur {
            let Some(parent) = self.get(pid) else { break };
            if parent.is_root() {
                break;
            }
            out.push(pid);
            cur = parent.parent;
        }
        out
    }

    /// `(url, title)` pairs from the top-level section down to the node with
    /// `url`, root excluded. The last pair is the node itself.
    pub fn crumbs(&self, url: &str) -> Vec<(String, String)> {
        let Some(node) = self.find_by_url(url) else {
            return Vec::new();
        };
        if node.is_root() {
            return Vec::new();
        }
        let mut chain: Vec<&Node> = self
            .ancestors(node.id)
            .into_iter()
            .filter_map(|id| self.get(id))
            .collect();
        chain.reverse();
        chain.push(node);
        chain
            .into_iter()
            .map(|n| (n.url.clone(), n.title.clone()))
            .collect()
    }

    /// Recompute every node's visibility from `hits` and return `self`.
    ///
    /// An empty hit list resets the tree to fully visible.
    pub fn filtered_by(&mut self, hits: &[SearchHit]) -> &Self {
        filter::apply(self, hits);
        self
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use pretty_assertions::assert_eq;

    fn sample() -> Tree {
        let manifest = Manifest {
            root: ManifestNode::new("design", "/").with_children(vec![
                ManifestNode::new("DisplayData", "DisplayData").with_children(vec![
                    ManifestNode::new("Table", "DisplayData/Table")
                        .with_children(vec![ManifestNode::new("Row", "DisplayData/Table/Row")]),
                    ManifestNode::new("List", "DisplayData/List"),
                ]),
                ManifestNode::new("Inputs", "Inputs"),
            ]),
        };
        Tree::from_manifest(manifest).unwrap()
    }

    #[test]
    fn flatten_is_preorder_and_complete() {
        let tree = sample();
        let urls: Vec<_> = tree.flatten().iter().map(|n| n.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "/",
                "DisplayData",
                "DisplayData/Table",
                "DisplayData/Table/Row",
                "DisplayData/List",
                "Inputs"
            ]
        );
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn ancestors_exclude_root() {
        let tree = sample();
        let row = tree.find_by_url("DisplayData/Table/Row").unwrap().id();
        let urls: Vec<_> = tree
            .ancestors(row)
            .into_iter()
            .map(|id| tree.get(id).unwrap().url.clone())
            .collect();
        assert_eq!(urls, vec!["DisplayData/Table", "DisplayData"]);
    }

    #[test]
    fn crumbs_run_top_down() {
        let tree = sample();
        let titles: Vec<_> = tree
            .crumbs("/DisplayData/Table/Row")
            .into_iter()
            .map(|(_, t)| t)
            .collect();
        assert_eq!(titles, vec!["DisplayData", "Table", "Row"]);
        assert!(tree.crumbs("/").is_empty());
        assert!(tree.crumbs("nope").is_empty());
    }

    #[test]
    fn child_lookup_by_key() {
        let tree = sample();
        let data = tree.find_by_url("DisplayData").unwrap().id();
        assert_eq!(tree.child(data, "List").unwrap().url, "DisplayData/List");
        assert!(tree.child(data, "Row").is_none());
    }

    #[test]
    fn duplicate_url_is_rejected() {
        let manifest = Manifest {
            root: ManifestNode::new("r", "/").with_children(vec![
                ManifestNode::new("A", "A"),
                ManifestNode::new("A again", "A"),
            ]),
        };
        assert!(matches!(
            Tree::from_manifest(manifest),
            Err(NavError::DuplicateUrl(u)) if u == "A"
        ));
    }

    #[test]
    fn empty_child_url_is_rejected() {
        let manifest = Manifest {
            root: ManifestNode::new("r", "/").with_children(vec![ManifestNode::new("blank", "")]),
        };
        assert!(matches!(Tree::from_manifest(manifest), Err(NavError::Malformed(_))));
    }

    struct Canned(Result<String, FetchError>);

    impl Backend for Canned {
        async fn fetch_manifest(&self) -> Result<String, FetchError> {
            self.0.clone()
        }

        async fn fetch_fragment(&self, _node_url: &str) -> Result<String, FetchError> {
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn sync_builds_from_backend() {
        let body = r#"{"status":"success","data":{"root":{"title":"r","url":"/",
            "children":[{"title":"A","url":"A","children":null}]}}}"#;
        let backend = Canned(Ok(body.to_string()));
        let tree = Tree::sync(&backend).await.unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root().children().len(), 1);
    }

    #[tokio::test]
    async fn sync_propagates_fetch_failure() {
        let backend = Canned(Err(FetchError::Status {
            url: "http://x/api/tree".into(),
            status: 500,
        }));
        assert!(matches!(
            Tree::sync(&backend).await,
            Err(NavError::Fetch(FetchError::Status { status: 500, .. }))
        ));
    }
}
