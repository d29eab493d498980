//! Test builders: constructors for trees, sessions, and random tree shapes.
//!
//! These are written for readability in assertions and panic on invalid
//! input rather than returning `Result`.

use super::fixtures::MANIFEST_NESTED;
use nav_backend::{settle, HttpBackend};
use nav_core::config::SearchConfig;
use nav_core::manifest::{Manifest, ManifestNode};
use nav_core::{Event, Location, Session, Tree};

/// The fixture site as a tree.
pub fn site_tree() -> Tree {
    Tree::from_manifest(Manifest::from_json(MANIFEST_NESTED).expect("fixture manifest parses"))
        .expect("fixture manifest builds")
}

/// A synced session over the fixture site, without any backend.
pub fn site_session(at: &str) -> Session {
    let (mut session, _) = Session::new(Location::parse(at), SearchConfig::default(), "/tree");
    session.dispatch(Event::TreeSynced(Ok(site_tree())));
    session
}

/// Start a session at `at` against `backend` and run its startup fetches.
pub async fn open_session(backend: &HttpBackend, at: &str) -> Session {
    let (mut session, effects) =
        Session::new(Location::parse(at), SearchConfig::default(), "/tree");
    settle(&mut session, backend, effects).await;
    session
}

/// Dispatch `event` and run whatever it asks for.
pub async fn act(session: &mut Session, backend: &HttpBackend, event: Event) {
    let effects = session.dispatch(event);
    settle(session, backend, effects).await;
}

/// Url given to node `i` of a generated tree.
pub fn generated_url(i: usize) -> String {
    format!("n{i}")
}

/// Build a tree from a parent table: `parents[i - 1]` is the parent of node
/// `i`, and must be smaller than `i`. Node 0 is the root.
pub fn tree_from_parents(parents: &[usize]) -> Tree {
    let n = parents.len() + 1;
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, &p) in parents.iter().enumerate() {
        assert!(p <= i, "parent of node {} must precede it", i + 1);
        children[p].push(i + 1);
    }

    fn build(i: usize, children: &[Vec<usize>]) -> ManifestNode {
        let url = if i == 0 { "/".to_string() } else { generated_url(i) };
        ManifestNode::new(format!("node {i}"), url)
            .with_children(children[i].iter().map(|&c| build(c, children)).collect())
    }

    Tree::from_manifest(Manifest { root: build(0, &children) }).expect("generated tree builds")
}
