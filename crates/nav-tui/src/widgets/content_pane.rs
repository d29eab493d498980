//! Content pane: the loaded fragment on the right.
//!
//! # Navigation (when pane is focused)
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k`, `↓` / `j` | Scroll one line |
//! | `PageUp` / `Ctrl+u`, `PageDown` / `Ctrl+d` | Scroll one page |
//! | `←` / `h`, `→` / `l` | Select previous / next keyword |
//! | `Enter` | Search for the selected keyword |

use std::cell::Cell;

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use nav_core::{ContentStatus, Fragment};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{
        Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
        Wrap,
    },
};

const CRUMB_SEPARATOR: &str = " › ";

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ContentPaneState {
    /// First visible line.
    pub scroll: usize,
    /// Index into the fragment's keywords of the selected keyword.
    pub keyword: usize,
    /// Node url of the fragment the scroll and keyword positions belong to.
    shown: Option<String>,
    /// Cached from the last render so `handle()` can page.
    last_height: Cell<usize>,
}

impl Default for ContentPaneState {
    fn default() -> Self {
        Self {
            scroll: 0,
            keyword: 0,
            shown: None,
            last_height: Cell::new(20),
        }
    }
}

impl ContentPaneState {
    fn page(&self) -> usize {
        self.last_height.get().max(1)
    }

    /// Reset scroll and keyword selection when a different fragment is shown.
    pub fn follow(&mut self, fragment: Option<&Fragment>) {
        let url = fragment.map(|f| f.node_url.as_str());
        if self.shown.as_deref() != url {
            tracing::trace!(node = ?url, "content: new fragment");
            self.shown = url.map(str::to_string);
            self.scroll = 0;
            self.keyword = 0;
        }
    }

    /// Handle an event. Returns the keyword to search when one is activated.
    pub fn handle(&mut self, event: &AppEvent, fragment: Option<&Fragment>) -> Option<String> {
        let fragment = fragment?;
        let last_line = fragment.lines.len().saturating_sub(1);
        let keywords = fragment.keywords.len();

        match event {
            AppEvent::Nav(Direction::Up) => self.scroll = self.scroll.saturating_sub(1),
            AppEvent::Nav(Direction::Down) => self.scroll = (self.scroll + 1).min(last_line),
            AppEvent::ScrollUp => self.scroll = self.scroll.saturating_sub(self.page()),
            AppEvent::ScrollDown => self.scroll = (self.scroll + self.page()).min(last_line),
            AppEvent::Nav(Direction::Left) if keywords > 0 => {
                self.keyword = (self.keyword + keywords - 1) % keywords;
            }
            AppEvent::Nav(Direction::Right) if keywords > 0 => {
                self.keyword = (self.keyword + 1) % keywords;
            }
            AppEvent::Enter => {
                let keyword = fragment.keywords.get(self.keyword).cloned();
                if let Some(k) = &keyword {
                    tracing::debug!(keyword = %k, "content: keyword activated");
                }
                return keyword;
            }
            _ => {}
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct ContentPane<'a> {
    state: &'a ContentPaneState,
    fragment: Option<&'a Fragment>,
    status: &'a ContentStatus,
    crumbs: Vec<String>,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> ContentPane<'a> {
    pub fn new(
        state: &'a ContentPaneState,
        fragment: Option<&'a Fragment>,
        status: &'a ContentStatus,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            state,
            fragment,
            status,
            crumbs: Vec::new(),
            focused,
            theme,
        }
    }

    pub fn crumbs(mut self, crumbs: Vec<String>) -> Self {
        self.crumbs = crumbs;
        self
    }

    fn status_line(&self) -> Option<Line<'static>> {
        match self.status {
            ContentStatus::Idle => None,
            ContentStatus::Loading { node_url } => Some(Line::from(Span::styled(
                format!("loading {node_url}…"),
                self.theme.status_loading,
            ))),
            ContentStatus::Failed { node_url, reason } => Some(Line::from(Span::styled(
                format!("failed to load {node_url}: {reason}"),
                self.theme.status_error,
            ))),
        }
    }

    fn body(&self, fragment: &'a Fragment) -> Vec<Line<'a>> {
        let selected = fragment.keywords.get(self.state.keyword);
        fragment
            .lines
            .iter()
            .skip(self.state.scroll)
            .map(|line| {
                let style = if Some(line) == fragment.title.as_ref() {
                    self.theme.content_heading
                } else if self.focused && Some(line) == selected {
                    self.theme.content_keyword_selected
                } else if fragment.keywords.contains(line) {
                    self.theme.content_keyword
                } else {
                    self.theme.content_text
                };
                Line::from(Span::styled(line.as_str(), style))
            })
            .collect()
    }
}

impl Widget for ContentPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.crumbs.is_empty() {
            "Content".to_string()
        } else {
            self.crumbs.join(CRUMB_SEPARATOR)
        };
        let block = Block::bordered()
            .title(title)
            .border_style(self.theme.border(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        if let Some(status) = self.status_line() {
            lines.push(status);
            lines.push(Line::default());
        }
        match self.fragment {
            Some(fragment) => lines.extend(self.body(fragment)),
            None if lines.is_empty() => lines.push(Line::from(Span::styled(
                "select an entry and press Enter",
                self.theme.nav_ghosted,
            ))),
            None => {}
        }

        self.state.last_height.set(inner.height as usize);

        let text_area = Rect { width: inner.width.saturating_sub(1), ..inner };
        let sb_area = Rect {
            x: inner.right().saturating_sub(1),
            width: 1,
            ..inner
        };
        Paragraph::new(lines).wrap(Wrap { trim: false }).render(text_area, buf);

        let total = self.fragment.map_or(0, |f| f.lines.len());
        if total > inner.height as usize {
            let mut sb_state = ScrollbarState::new(total)
                .position(self.state.scroll)
                .viewport_content_length(inner.height as usize);
            StatefulWidget::render(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(None)
                    .end_symbol(None),
                sb_area,
                buf,
                &mut sb_state,
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fragment() -> Fragment {
        Fragment::parse(
            "A/B",
            concat!(
                r#"<h1>B</h1><p>one</p><p>two</p>"#,
                r#"<span class="keyword">grid</span><span class="keyword">rows</span>"#,
            ),
        )
    }

    #[test]
    fn keyword_cursor_wraps_and_activates() {
        let f = fragment();
        let mut state = ContentPaneState::default();
        state.handle(&AppEvent::Nav(Direction::Left), Some(&f));
        assert_eq!(state.keyword, 1);
        assert_eq!(state.handle(&AppEvent::Enter, Some(&f)).as_deref(), Some("rows"));
        state.handle(&AppEvent::Nav(Direction::Right), Some(&f));
        assert_eq!(state.handle(&AppEvent::Enter, Some(&f)).as_deref(), Some("grid"));
    }

    #[test]
    fn scroll_is_bounded_by_content() {
        let f = fragment();
        let mut state = ContentPaneState::default();
        for _ in 0..20 {
            state.handle(&AppEvent::Nav(Direction::Down), Some(&f));
        }
        assert_eq!(state.scroll, f.lines.len() - 1);
        state.handle(&AppEvent::ScrollUp, Some(&f));
        assert_eq!(state.scroll, 0);
    }

    #[test]
    fn new_fragment_resets_position() {
        let f = fragment();
        let mut state = ContentPaneState::default();
        state.follow(Some(&f));
        state.handle(&AppEvent::Nav(Direction::Down), Some(&f));
        state.handle(&AppEvent::Nav(Direction::Right), Some(&f));
        state.follow(Some(&f));
        assert_eq!((state.scroll, state.keyword), (1, 1));

        let other = Fragment::parse("C", "<p>c</p>");
        state.follow(Some(&other));
        assert_eq!((state.scroll, state.keyword), (0, 0));
    }

    #[test]
    fn nothing_loaded_ignores_events() {
        let mut state = ContentPaneState::default();
        assert_eq!(state.handle(&AppEvent::Enter, None), None);
    }
}
