//! Navigation tree widget: the filtered node tree in the left pane.
//!
//! The entries themselves belong to the session and are re-rendered after
//! every search; this widget only keeps the cursor and which branches the
//! user has collapsed. While a search is active every branch is shown
//! expanded, so a collapsed branch can never hide a match.
//!
//! # Navigation
//! - `↑`/`k` and `↓`/`j` move the cursor.
//! - `←`/`h` collapses the entry under the cursor, `→`/`l` expands it.
//! - `Enter` opens the entry's content.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use nav_core::NavEntry;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, StatefulWidget, Widget},
};
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct NavTreeState {
    /// Index into the currently-visible (flattened) list.
    pub cursor: usize,
    /// Urls of collapsed entries.
    pub collapsed: HashSet<String>,
}

impl NavTreeState {
    /// Flatten `entries` into `(depth, &entry)` pairs, respecting collapsed
    /// state unless `searching`.
    pub fn visible<'a>(
        &self,
        entries: &'a [NavEntry],
        searching: bool,
    ) -> Vec<(usize, &'a NavEntry)> {
        let mut out = Vec::new();
        self.flatten_into(entries, 0, searching, &mut out);
        out
    }

    fn flatten_into<'a>(
        &self,
        entries: &'a [NavEntry],
        depth: usize,
        searching: bool,
        out: &mut Vec<(usize, &'a NavEntry)>,
    ) {
        for entry in entries {
            out.push((depth, entry));
            if searching || !self.collapsed.contains(&entry.url) {
                self.flatten_into(&entry.children, depth + 1, searching, out);
            }
        }
    }

    /// Handle an [`AppEvent`]. Returns the `href` to open when the event
    /// activates an entry.
    pub fn handle(
        &mut self,
        event: &AppEvent,
        entries: &[NavEntry],
        searching: bool,
    ) -> Option<String> {
        let visible = self.visible(entries, searching);
        let current = visible.get(self.cursor).map(|(_, e)| *e);

        match event {
            AppEvent::Nav(Direction::Up) => {
                self.cursor = self.cursor.saturating_sub(1);
                tracing::trace!(cursor = self.cursor, "nav tree: cursor up");
            }
            AppEvent::Nav(Direction::Down) => {
                if self.cursor + 1 < visible.len() {
                    self.cursor += 1;
                }
                tracing::trace!(cursor = self.cursor, "nav tree: cursor down");
            }
            AppEvent::Nav(Direction::Left) => {
                if let Some(entry) = current.filter(|e| !e.children.is_empty()) {
                    tracing::debug!(url = %entry.url, "nav tree: collapse");
                    self.collapsed.insert(entry.url.clone());
                }
            }
            AppEvent::Nav(Direction::Right) => {
                if let Some(entry) = current {
                    tracing::debug!(url = %entry.url, "nav tree: expand");
                    self.collapsed.remove(&entry.url);
                }
            }
            AppEvent::Enter => {
                if let Some(entry) = current {
                    tracing::debug!(href = %entry.href, "nav tree: open");
                    return Some(entry.href.clone());
                }
            }
            _ => {}
        }
        self.clamp_cursor(entries, searching);
        None
    }

    /// Keep the cursor inside the visible list, e.g. after a search shrank it.
    pub fn clamp_cursor(&mut self, entries: &[NavEntry], searching: bool) {
        let max = self.visible(entries, searching).len().saturating_sub(1);
        if self.cursor > max {
            self.cursor = max;
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct NavTree<'a> {
    state: &'a NavTreeState,
    entries: &'a [NavEntry],
    searching: bool,
    /// Url of the node whose content is shown.
    current: Option<&'a str>,
    title: String,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> NavTree<'a> {
    pub fn new(
        state: &'a NavTreeState,
        entries: &'a [NavEntry],
        searching: bool,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            state,
            entries,
            searching,
            current: None,
            title: "Navigation".to_string(),
            focused,
            theme,
        }
    }

    pub fn current(mut self, url: Option<&'a str>) -> Self {
        self.current = url;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl Widget for NavTree<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(self.title.as_str())
            .border_style(self.theme.border(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);

        let items: Vec<ListItem> = self
            .state
            .visible(self.entries, self.searching)
            .into_iter()
            .map(|(depth, entry)| {
                let expand = if entry.children.is_empty() {
                    "  "
                } else if self.searching || !self.state.collapsed.contains(&entry.url) {
                    "▼ "
                } else {
                    "▶ "
                };
                let style = if entry.ghosted {
                    self.theme.nav_ghosted
                } else if self.current == Some(entry.url.as_str()) {
                    self.theme.nav_current
                } else {
                    self.theme.nav_link
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{}{}", "  ".repeat(depth), expand)),
                    Span::styled(entry.title.as_str(), style),
                ]))
            })
            .collect();

        let list = List::new(items).highlight_style(self.theme.nav_selected);
        let selected = if self.focused { Some(self.state.cursor) } else { None };
        let mut list_state = ListState::default().with_selected(selected);
        StatefulWidget::render(list, inner, buf, &mut list_state);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
