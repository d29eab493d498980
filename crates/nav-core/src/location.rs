//! The navigator's address bar: a content path plus the search
//! query.
//!
//! The string form is `/<node url>?<query>`. Each path segment and the query
//! are percent-encoded when written and decoded when read, so a location copied out of the app and
//! passed back in on the command line reproduces the same filtered view.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: String,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            query: String::new(),
        }
    }
}

impl Location {
    pub fn new(path: &str, query: impl Into<String>) -> Self {
        Self {
            path: normalize_path(path),
            query: query.into(),
        }
    }

    /// Parse `/<path>?<query>`. A missing leading slash is tolerated; an
    /// undecodable path or query is kept verbatim.
    pub fn parse(src: &str) -> Self {
        let (path, query) = match src.split_once('?') {
            Some((p, q)) => (p, q),
            None => (src, ""),
        };
        let path = decode_or_keep(path);
        let query = decode_or_keep(&query.replace('+', " "));
        Self::new(&path, query)
    }

    /// Location of the node with `node_url`.
    pub fn for_node(node_url: &str, query: impl Into<String>) -> Self {
        Self::new(node_url, query)
    }

    /// Location a link target points at: `href` with the backend's fragment
    /// prefix removed (`/tree/A/B` → `/A/B`).
    pub fn from_link(href: &str, fragment_prefix: &str, query: impl Into<String>) -> Self {
        let prefix = fragment_prefix.trim_end_matches('/');
        let path = if prefix.is_empty() {
            href
        } else {
            match href.strip_prefix(prefix) {
                Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
                _ => href,
            }
        };
        Self::new(path, query)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn is_root(&self) -> bool {
        self.path == "/"
    }

    /// Url of the node this location selects, or `None` for the site root.
    pub fn node_url(&self) -> Option<&str> {
        if self.is_root() {
            None
        } else {
            Some(self.path.trim_start_matches('/'))
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("/")?;
        } else {
            for segment in self.path.trim_start_matches('/').split('/') {
                write!(f, "/{}", urlencoding::encode(segment))?;
            }
        }
        if !self.query.is_empty() {
            write!(f, "?{}", urlencoding::encode(&self.query))?;
        }
        Ok(())
    }
}

fn decode_or_keep(src: &str) -> String {
    urlencoding::decode(src)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| src.to_string())
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}
