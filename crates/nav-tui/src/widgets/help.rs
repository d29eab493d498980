//! Help popup: centred floating overlay listing all keybindings.
//!
//! Toggle with `?`; close with `?` or `Escape`.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

const BINDINGS: &[(&str, &str)] = &[
    ("q  /  Ctrl+c", "Quit"),
    ("Tab", "Cycle focus: nav → content → search"),
    ("/", "Focus search bar"),
    ("Escape", "Return focus from search bar"),
    ("Ctrl+l", "Clear search"),
    ("↑ k  /  ↓ j", "Move cursor or scroll content"),
    ("← h  /  → l", "Collapse / expand, or select keyword"),
    ("Enter", "Open entry, or search selected keyword"),
    ("PageUp  /  Ctrl+u", "Scroll content up"),
    ("PageDown / Ctrl+d", "Scroll content down"),
    ("[  /  ]", "History back / forward"),
    (":", "Command line"),
    ("?", "Toggle this help popup"),
];

const COMMANDS: &[(&str, &str)] = &[
    (":open <path>", "Load a node, e.g. :open DisplayData/Table"),
    (":back  :forward", "History traversal"),
    (":clear", "Clear search"),
    (":reload", "Retry a failed manifest load"),
    (":theme <name>", "default, gruvbox"),
    (":q", "Quit"),
];

pub struct HelpPopup<'a> {
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (BINDINGS.len() + COMMANDS.len() + 3) as u16;
        let popup = centered_rect(72, height, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" dsk-nav: keybindings (? to close) ")
            .border_style(self.theme.border_focused);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let row = |(key, desc): &(&'static str, &'static str)| {
            Line::from(vec![
                Span::styled(format!("  {key:<22}"), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(*desc),
            ])
        };
        let mut lines: Vec<Line> = BINDINGS.iter().map(row).collect();
        lines.push(Line::default());
        lines.extend(COMMANDS.iter().map(row));

        Paragraph::new(lines).render(inner, buf);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
