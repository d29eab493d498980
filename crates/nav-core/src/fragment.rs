//! Content fragments: the HTML the backend serves for one node, reduced to
//! what a terminal can show.
//!
//! Elements with the `keyword` class are the interactive part: activating one
//! runs a search for its text. They are collected fresh for every fragment,
//! so keyword bindings always match the content on screen.

use scraper::{Html, Selector};
use std::sync::OnceLock;

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "template"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Url of the node this fragment belongs to.
    pub node_url: String,
    /// Text of the first `<h1>`, if any.
    pub title: Option<String>,
    /// Visible text, one line per text node.
    pub lines: Vec<String>,
    /// Distinct keyword texts in document order.
    pub keywords: Vec<String>,
    pub html: String,
}

fn keyword_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse(".keyword").expect("static selector is valid"))
}

fn heading_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("h1").expect("static selector is valid"))
}

impl Fragment {
    pub fn parse(node_url: impl Into<String>, html: impl Into<String>) -> Self {
        let html = html.into();
        let doc = Html::parse_fragment(&html);

        let title = doc
            .select(heading_selector())
            .next()
            .map(|h| collapse_whitespace(&h.text().collect::<String>()))
            .filter(|t| !t.is_empty());

        let mut keywords: Vec<String> = Vec::new();
        for el in doc.select(keyword_selector()) {
            let text = collapse_whitespace(&el.text().collect::<String>());
            if !text.is_empty() && !keywords.contains(&text) {
                keywords.push(text);
            }
        }

        let lines = doc
            .root_element()
            .descendants()
            .filter_map(|node| {
                let text = node.value().as_text()?;
                let parent_skipped = node
                    .parent()
                    .and_then(|p| {
                        p.value()
                            .as_element()
                            .map(|e| SKIPPED_ELEMENTS.contains(&e.name()))
                    })
                    .unwrap_or(false);
                if parent_skipped {
                    return None;
                }
                let line = collapse_whitespace(text);
                (!line.is_empty()).then_some(line)
            })
            .collect();

        Self {
            node_url: node_url.into(),
            title,
            lines,
            keywords,
            html,
        }
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
