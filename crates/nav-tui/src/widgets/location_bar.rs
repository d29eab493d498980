//! Location bar: the 1-line strip at the top of the screen showing the
//! current location and history position, with keybinding hints on the right.

use crate::theme::Theme;
use nav_core::{Location, NavStatus};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

pub struct LocationBar<'a> {
    location: &'a Location,
    can_go_back: bool,
    can_go_forward: bool,
    status: &'a NavStatus,
    theme: &'a Theme,
}

impl<'a> LocationBar<'a> {
    pub fn new(location: &'a Location, status: &'a NavStatus, theme: &'a Theme) -> Self {
        Self {
            location,
            can_go_back: false,
            can_go_forward: false,
            status,
            theme,
        }
    }

    pub fn history(mut self, back: bool, forward: bool) -> Self {
        self.can_go_back = back;
        self.can_go_forward = forward;
        self
    }
}

impl Widget for LocationBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dim = Style::default().add_modifier(Modifier::DIM);
        let arrow = |enabled: bool, glyph: &'static str| {
            if enabled {
                Span::raw(glyph)
            } else {
                Span::styled(glyph, dim)
            }
        };

        let mut spans = vec![
            Span::raw(" "),
            arrow(self.can_go_back, "◀"),
            Span::raw(" "),
            arrow(self.can_go_forward, "▶"),
            Span::raw("  "),
            Span::styled(self.location.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        ];
        match self.status {
            NavStatus::Loading => spans.push(Span::styled(
                "  loading navigation…",
                self.theme.status_loading,
            )),
            NavStatus::Failed(reason) => spans.push(Span::styled(
                format!("  navigation unavailable: {reason} (:reload to retry)"),
                self.theme.status_error,
            )),
            NavStatus::Ready => {}
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        let hint = " q:quit  ?:help ";
        let hint_x = area.right().saturating_sub(hint.len() as u16);
        buf.set_string(hint_x, area.y, hint, dim);
    }
}
