//! Filter pass: decides which nodes are kept, ghosted, or pruned.
//!
//! Given the hits for the active query:
//!
//! - no known hits: every node is kept and none is ghosted (reset);
//! - a hit is kept and not ghosted;
//! - a strict ancestor of a hit (root excluded) that is not itself a hit is
//!   kept and ghosted, so the match is shown in its path context;
//! - everything else is pruned (`keep = false`).
//!
//! The root is always kept. Flags are rewritten for every node on every pass,
//! so nothing from a previous query survives.

use crate::node::NodeId;
use crate::search::SearchHit;
use crate::tree::Tree;
use std::collections::HashSet;

pub(crate) fn apply(tree: &mut Tree, hits: &[SearchHit]) {
    let matched: HashSet<NodeId> = hits
        .iter()
        .map(|h| h.node)
        .filter(|id| {
            let known = tree.get(*id).is_some();
            if !known {
                tracing::warn!(node = id.index(), "filter: hit for unknown node ignored");
            }
            known
        })
        .collect();

    if matched.is_empty() {
        reset(tree);
        return;
    }

    let ids: Vec<NodeId> = tree.ids().collect();
    for id in &ids {
        if let Some(node) = tree.get_mut(*id) {
            node.set_visibility(false, false);
        }
    }

    let mut ghosts: HashSet<NodeId> = HashSet::new();
    for id in &matched {
        for ancestor in tree.ancestors(*id) {
            if !matched.contains(&ancestor) {
                ghosts.insert(ancestor);
            }
        }
    }

    for id in &matched {
        if let Some(node) = tree.get_mut(*id) {
            node.set_visibility(true, false);
        }
    }
    for id in &ghosts {
        if let Some(node) = tree.get_mut(*id) {
            node.set_visibility(true, true);
        }
    }

    let root = tree.root_id();
    if let Some(node) = tree.get_mut(root) {
        node.set_visibility(true, false);
    }

    tracing::debug!(
        matched = matched.len(),
        ghosted = ghosts.len(),
        "filter: visibility recomputed"
    );
}

pub(crate) fn reset(tree: &mut Tree) {
    let ids: Vec<NodeId> = tree.ids().collect();
    for id in ids {
        if let Some(node) = tree.get_mut(id) {
            node.set_visibility(true, false);
        }
    }
    tracing::debug!(nodes = tree.len(), "filter: reset");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
