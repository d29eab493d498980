//! Search index: fuzzy matching over node titles, urls, and keywords.
//!
//! Built once from [`Tree::flatten`] right after the tree is synced. Each
//! query is matched as a single pattern (no tokenization) against every field
//! value of every indexed node using [`nucleo_matcher`]. A raw matcher hit is
//! only accepted when it is tight and close to the start of the value:
//!
//! ```text
//! score = gaps / pattern_len + |first_index - location| / distance
//! ```
//!
//! where `gaps` is the number of unmatched characters between the first and
//! last matched character. The leftmost contiguous occurrence of the pattern
//! is scored the same way (with no gaps) and the lower of the two counts, so
//! a tight match near the start is never lost to a later alignment the
//! matcher prefers. Values equal to the pattern (ignoring case) score
//! `0`. A value matches when `score <= threshold`; a node's score is the best
//! score among its fields. Results come back best-first.

use crate::config::SearchConfig;
use crate::node::NodeId;
use crate::tree::Tree;
use nucleo_matcher::{Config, Matcher, Utf32Str};

/// A node that matched the query, with its score (lower is better).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub node: NodeId,
    pub score: f64,
}

#[derive(Debug, Clone)]
struct Document {
    node: NodeId,
    /// Title, url, then each keyword.
    fields: Vec<String>,
}

pub struct SearchIndex {
    matcher: Matcher,
    config: SearchConfig,
    docs: Vec<Document>,
}

impl std::fmt::Debug for SearchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchIndex")
            .field("docs", &self.docs.len())
            .field("config", &self.config)
            .finish()
    }
}

impl SearchIndex {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            config,
            docs: Vec::new(),
        }
    }

    /// Build an index over every non-root node of `tree`.
    pub fn build(tree: &Tree, config: SearchConfig) -> Self {
        let mut index = Self::new(config);
        index.reindex(tree);
        index
    }

    /// Replace the indexed collection with a fresh snapshot of `tree`.
    pub fn reindex(&mut self, tree: &Tree) {
        self.docs = tree
            .flatten()
            .into_iter()
            .filter(|n| !n.is_root())
            .map(|n| {
                let mut fields = Vec::with_capacity(2 + n.meta.keywords.len());
                fields.push(n.title.clone());
                fields.push(n.url.clone());
                fields.extend(n.meta.keywords.iter().cloned());
                Document { node: n.id(), fields }
            })
            .collect();
        tracing::debug!(docs = self.docs.len(), "search: indexed");
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Match `query` against the index. A blank query has no hits, which the
    /// filter pass treats as "no active filter".
    pub fn search(&mut self, query: &str) -> Vec<SearchHit> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let pattern = query.to_lowercase();
        let pattern_len = pattern.chars().count();
        if pattern_len < self.config.min_match_char_length {
            return Vec::new();
        }

        let mut needle_buf = Vec::new();
        let mut hay_buf = Vec::new();
        let mut indices = Vec::new();
        let mut hits = Vec::new();

        for doc in &self.docs {
            let best = doc
                .fields
                .iter()
                .filter_map(|value| {
                    score_value(
                        &mut self.matcher,
                        &self.config,
                        &pattern,
                        pattern_len,
                        value,
                        &mut needle_buf,
                        &mut hay_buf,
                        &mut indices,
                    )
                })
                .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.min(s))));

            if let Some(score) = best {
                hits.push(SearchHit {
                    node: doc.node,
                    score,
                });
            }
        }

        // Stable: equal scores keep tree order.
        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        tracing::debug!(query = %query, hits = hits.len(), "search: done");
        hits
    }
}

#[allow(clippy::too_many_arguments)]
fn score_value(
    matcher: &mut Matcher,
    config: &SearchConfig,
    pattern: &str,
    pattern_len: usize,
    value: &str,
    needle_buf: &mut Vec<char>,
    hay_buf: &mut Vec<char>,
    indices: &mut Vec<u32>,
) -> Option<f64> {
    let lowered = value.to_lowercase();
    if lowered == pattern {
        return Some(0.0);
    }

    // Leftmost contiguous occurrence: no gaps, only the location penalty.
    let contiguous = lowered
        .find(pattern)
        .map(|byte| location_penalty(config, lowered[..byte].chars().count()));

    let needle = Utf32Str::new(pattern, needle_buf);
    let haystack = Utf32Str::new(value, hay_buf);
    indices.clear();

    let found = if pattern_len > config.max_pattern_length {
        matcher.substring_indices(haystack, needle, indices)
    } else {
        matcher.fuzzy_indices(haystack, needle, indices)
    };
    let aligned = found.and_then(|_| {
        indices.sort_unstable();
        indices.dedup();
        let first = *indices.first()? as usize;
        let last = *indices.last()? as usize;
        let span = last - first + 1;
        let gaps = span.saturating_sub(pattern_len);
        Some(gaps as f64 / pattern_len as f64 + location_penalty(config, first))
    });

    let score = match (contiguous, aligned) {
        (Some(a), Some(b)) => a.min(b),
        (a, b) => a.or(b)?,
    };
    (score <= config.threshold).then_some(score)
}

fn location_penalty(config: &SearchConfig, first: usize) -> f64 {
    let proximity = first.abs_diff(config.location);
    if config.distance == 0 {
        if proximity == 0 { 0.0 } else { 1.0 }
    } else {
        proximity as f64 / config.distance as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
