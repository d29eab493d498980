//! Nav renderer: projects the tree's visibility state into a list structure.

use crate::node::NodeId;
use crate::tree::Tree;
use serde::Serialize;
use std::fmt::Write as _;

/// One visible entry of the navigation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub title: String,
    pub url: String,
    /// Link target the entry activates, e.g. `/tree/DisplayData/Table`.
    pub href: String,
    /// Shown only as path context for a deeper match.
    pub ghosted: bool,
    pub children: Vec<NavEntry>,
}

/// Render the kept part of `tree`. The root itself is never rendered; its
/// children are the top-level entries.
pub fn render_nav(tree: &Tree, fragment_prefix: &str) -> Vec<NavEntry> {
    let prefix = fragment_prefix.trim_end_matches('/');
    tree.root()
        .children()
        .iter()
        .filter_map(|id| render_node(tree, *id, prefix))
        .collect()
}

fn render_node(tree: &Tree, id: NodeId, prefix: &str) -> Option<NavEntry> {
    let node = tree.get(id)?;
    if !node.keep() {
        return None;
    }
    Some(NavEntry {
        title: node.title.clone(),
        url: node.url.clone(),
        href: format!("{prefix}/{}", node.url),
        ghosted: node.is_ghost(),
        children: node
            .children()
            .iter()
            .filter_map(|c| render_node(tree, *c, prefix))
            .collect(),
    })
}

/// Plain-text outline: two spaces per level, `- ` for entries, `~ ` for
/// ghosted ones.
pub fn outline(entries: &[NavEntry]) -> String {
    let mut out = String::new();
    write_outline(&mut out, entries, 0);
    out
}

fn write_outline(out: &mut String, entries: &[NavEntry], depth: usize) {
    for entry in entries {
        let marker = if entry.ghosted { '~' } else { '-' };
        let _ = writeln!(out, "{}{} {}", "  ".repeat(depth), marker, entry.title);
        write_outline(out, &entry.children, depth + 1);
    }
}

/// Number of entries in the rendered list, nested ones included.
pub fn count(entries: &[NavEntry]) -> usize {
    entries.iter().map(|e| 1 + count(&e.children)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Manifest, ManifestNode};
    use crate::search::SearchHit;
    use pretty_assertions::assert_eq;

    fn tree() -> Tree {
        Tree::from_manifest(Manifest {
            root: ManifestNode::new("root", "/").with_children(vec![ManifestNode::new("A", "A")
                .with_children(vec![
                    ManifestNode::new("B", "A/B"),
                    ManifestNode::new("C", "A/C"),
                ])]),
        })
        .unwrap()
    }

    #[test]
    fn unfiltered_tree_renders_everything_but_root() {
        let t = tree();
        let nav = render_nav(&t, "/tree");
        assert_eq!(outline(&nav), "- A\n  - B\n  - C\n");
        assert_eq!(nav[0].href, "/tree/A");
        assert_eq!(nav[0].children[1].href, "/tree/A/C");
        assert_eq!(count(&nav), 3);
    }

    #[test]
    fn pruned_nodes_are_absent_and_ghosts_marked() {
        let mut t = tree();
        let b = t.find_by_url("A/B").unwrap().id();
        t.filtered_by(&[SearchHit { node: b, score: 0.0 }]);
        let nav = render_nav(&t, "/tree/");
        assert_eq!(outline(&nav), "~ A\n  - B\n");
        assert!(nav[0].ghosted);
        assert!(!nav[0].children[0].ghosted);
    }
}
