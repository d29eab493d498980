//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic. Fetches run on the tokio
//! runtime; their results arrive on a channel that the loop drains every
//! tick, so the UI never blocks on the network.

use crate::{
    commands::{execute_command, Command},
    event::{self, AppEvent},
    theme::Theme,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        content_pane::{ContentPane, ContentPaneState},
        help::HelpPopup,
        location_bar::LocationBar,
        nav_tree::{NavTree, NavTreeState},
        query_bar::{QueryBar, QueryBarState},
    },
};
use crossterm::{
    event::{self as ct_event, Event as CtEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use nav_core::{config::Config, Backend, Effect, Event, Location, Session};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    Frame, Terminal,
};
use std::{io, sync::Arc, time::Duration};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Nav,
    Content,
    QueryBar,
    /// Vim-style `:` command line is active.
    Command,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub session: Session,
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub theme: Theme,
    pub config: Config,
    pub show_help: bool,
    pub nav_tree: NavTreeState,
    pub content: ContentPaneState,
    pub query: QueryBarState,
    pub command_bar: CommandBarState,
    pub quit: bool,
}

impl AppState {
    /// Build the state for a session starting at `location`. Returns the
    /// startup effects alongside.
    pub fn new(config: Config, location: Location, theme: Theme) -> (Self, Vec<Effect>) {
        let (session, effects) = Session::new(
            location,
            config.search.clone(),
            config.server.fragment_prefix.clone(),
        );
        let mut state = AppState {
            session,
            focus: Focus::Nav,
            prev_focus: Focus::Nav,
            theme,
            config,
            show_help: false,
            nav_tree: NavTreeState::default(),
            content: ContentPaneState::default(),
            query: QueryBarState::default(),
            command_bar: CommandBarState::default(),
            quit: false,
        };
        state.query.set(state.session.query());
        (state, effects)
    }

    fn searching(&self) -> bool {
        self.session.match_count().is_some()
    }

    /// Forward an event to the session and bring the widgets in line with
    /// whatever it changed.
    pub fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        let effects = self.session.dispatch(event);
        self.query.set(self.session.query());
        let searching = self.searching();
        self.nav_tree.clamp_cursor(self.session.nav(), searching);
        self.content.follow(self.session.content());
        effects
    }

    /// Apply one UI event. Returns the effects the session asked for.
    pub fn handle(&mut self, event: AppEvent) -> Vec<Effect> {
        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            if matches!(event, AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit) {
                tracing::debug!("help popup closed");
                self.show_help = false;
            }
            return Vec::new();
        }

        if self.focus == Focus::Command {
            return self.handle_command(event);
        }

        match event {
            AppEvent::Char('?') if self.focus != Focus::QueryBar => {
                tracing::debug!("help popup opened");
                self.show_help = true;
                Vec::new()
            }
            AppEvent::Char(':') if self.focus != Focus::QueryBar => {
                tracing::debug!(prev_focus = ?self.focus, "entering command mode");
                self.prev_focus = self.focus;
                self.command_bar.clear();
                self.focus = Focus::Command;
                Vec::new()
            }
            AppEvent::Quit => {
                tracing::debug!("quit");
                self.quit = true;
                Vec::new()
            }
            AppEvent::Escape => {
                if self.focus == Focus::QueryBar {
                    self.focus = Focus::Nav;
                }
                Vec::new()
            }
            AppEvent::FocusNext => {
                let next = match self.focus {
                    Focus::Nav => Focus::Content,
                    Focus::Content => Focus::QueryBar,
                    Focus::QueryBar | Focus::Command => Focus::Nav,
                };
                tracing::debug!(from = ?self.focus, to = ?next, "focus cycle");
                self.focus = next;
                Vec::new()
            }
            AppEvent::QueryFocus => {
                self.focus = Focus::QueryBar;
                Vec::new()
            }
            AppEvent::HistoryBack => self.dispatch(Event::HistoryBack),
            AppEvent::HistoryForward => self.dispatch(Event::HistoryForward),
            AppEvent::ClearSearch => self.dispatch(Event::ClearSearch),
            // Page keys always scroll the content, whatever has focus
            AppEvent::ScrollUp | AppEvent::ScrollDown => {
                self.content.handle(&event, self.session.content());
                Vec::new()
            }
            AppEvent::Resize(_, _) => Vec::new(),
            other => self.handle_focused(other),
        }
    }

    fn handle_focused(&mut self, event: AppEvent) -> Vec<Effect> {
        match self.focus {
            Focus::Nav => {
                let searching = self.searching();
                match self.nav_tree.handle(&event, self.session.nav(), searching) {
                    Some(href) => self.dispatch(Event::NavActivated(href)),
                    None => Vec::new(),
                }
            }
            Focus::Content => match self.content.handle(&event, self.session.content()) {
                Some(keyword) => self.dispatch(Event::KeywordClicked(keyword)),
                None => Vec::new(),
            },
            Focus::QueryBar => {
                if event == AppEvent::Enter {
                    self.focus = Focus::Nav;
                    return Vec::new();
                }
                if self.query.handle(&event) {
                    let query = self.query.query.clone();
                    self.dispatch(Event::QueryChanged(query))
                } else {
                    Vec::new()
                }
            }
            Focus::Command => Vec::new(),
        }
    }

    fn handle_command(&mut self, event: AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::Escape => {
                tracing::debug!("command bar cancelled");
                self.command_bar.clear();
                self.focus = self.prev_focus;
                Vec::new()
            }
            AppEvent::Enter => {
                let parsed = Command::parse(&self.command_bar.input);
                match parsed {
                    Ok(cmd) => {
                        tracing::debug!(command = ?cmd, "executing command");
                        match execute_command(self, cmd) {
                            Ok(effects) => {
                                self.command_bar.clear();
                                self.focus = self.prev_focus;
                                effects
                            }
                            Err(msg) => {
                                self.command_bar.error = Some(msg);
                                Vec::new()
                            }
                        }
                    }
                    Err(msg) if msg.is_empty() => {
                        self.command_bar.clear();
                        self.focus = self.prev_focus;
                        Vec::new()
                    }
                    Err(msg) => {
                        self.command_bar.error = Some(msg);
                        Vec::new()
                    }
                }
            }
            other => {
                self.command_bar.handle(&other);
                Vec::new()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App<B: Backend> {
    state: AppState,
    backend: Arc<B>,
    runtime: Handle,
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
}

impl<B: Backend> App<B> {
    pub fn new(
        config: Config,
        location: Location,
        backend: B,
        theme: Theme,
        runtime: Handle,
    ) -> Self {
        let (state, effects) = AppState::new(config, location, theme);
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App {
            state,
            backend: Arc::new(backend),
            runtime,
            tx,
            rx,
        };
        app.run_effects(effects);
        app
    }

    fn run_effects(&self, effects: Vec<Effect>) {
        if !effects.is_empty() {
            nav_backend::spawn(&self.runtime, &self.backend, effects, &self.tx);
        }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            while let Ok(event) = self.rx.try_recv() {
                let effects = self.state.dispatch(event);
                self.run_effects(effects);
            }

            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                let raw = ct_event::read()?;
                if let CtEvent::Key(key) = &raw {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                }
                // Use insert-mode mapping when a text widget is focused
                let app_event = if is_insert_mode(self.state.focus) {
                    event::to_app_event_insert(raw)
                } else {
                    event::to_app_event(raw)
                };
                if let Some(ev) = app_event {
                    tracing::debug!(focus = ?self.state.focus, event = ?ev, "key event");
                    let effects = self.state.handle(ev);
                    self.run_effects(effects);
                }
            }
        }
        Ok(())
    }
}

/// Returns true when the current focus is on a text-input widget, meaning
/// alphabetic keys should produce characters rather than trigger shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    matches!(focus, Focus::QueryBar | Focus::Command)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let session = &state.session;

    // Vertical: 1-line location bar | body | 3-line query bar
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([Constraint::Length(1), Constraint::Fill(1), Constraint::Length(3)])
        .split(area);

    let pct = state.config.ui.nav_pane_width_pct.min(90);
    let horiz = Layout::default()
        .direction(LayoutDir::Horizontal)
        .constraints([Constraint::Percentage(pct), Constraint::Fill(1)])
        .split(vert[1]);

    let history = session.history();
    frame.render_widget(
        LocationBar::new(session.location(), session.nav_status(), &state.theme)
            .history(history.can_go_back(), history.can_go_forward()),
        vert[0],
    );
    frame.render_widget(
        NavTree::new(
            &state.nav_tree,
            session.nav(),
            session.match_count().is_some(),
            state.focus == Focus::Nav,
            &state.theme,
        )
        .current(session.content().map(|f| f.node_url.as_str())),
        horiz[0],
    );
    frame.render_widget(
        ContentPane::new(
            &state.content,
            session.content(),
            session.content_status(),
            state.focus == Focus::Content,
            &state.theme,
        )
        .crumbs(session.crumbs()),
        horiz[1],
    );
    frame.render_widget(
        QueryBar::new(
            &state.query,
            session.match_count(),
            state.focus == Focus::QueryBar,
            &state.theme,
        ),
        vert[2],
    );

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.theme), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect {
            y: area.bottom().saturating_sub(1),
            height: 1,
            ..area
        };
        frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
        return;
    }

    if state.focus == Focus::QueryBar {
        let qb = QueryBar::new(&state.query, None, true, &state.theme);
        frame.set_cursor_position(qb.cursor_position(vert[2]));
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Direction;
    use nav_core::manifest::{Manifest, ManifestNode};
    use nav_core::Tree;
    use pretty_assertions::assert_eq;

    fn state() -> AppState {
        let (mut s, _) =
            AppState::new(Config::defaults(), Location::default(), Theme::load_default());
        let tree = Tree::from_manifest(Manifest {
            root: ManifestNode::new("docs", "/").with_children(vec![
                ManifestNode::new("Alpha", "Alpha")
                    .with_children(vec![ManifestNode::new("Bravo", "Alpha/Bravo")]),
                ManifestNode::new("Delta", "Delta"),
            ]),
        })
        .unwrap();
        s.dispatch(Event::TreeSynced(Ok(tree)));
        s
    }

    fn type_str(s: &mut AppState, text: &str) {
        for c in text.chars() {
            s.handle(AppEvent::Char(c));
        }
    }

    #[test]
    fn typing_in_query_bar_filters_nav() {
        let mut s = state();
        s.handle(AppEvent::QueryFocus);
        type_str(&mut s, "delta");
        assert_eq!(s.session.query(), "delta");
        assert_eq!(s.session.match_count(), Some(1));
        // `q` is a letter while typing, not quit
        type_str(&mut s, "q");
        assert!(!s.quit);
    }

    #[test]
    fn enter_on_nav_entry_requests_fragment() {
        let mut s = state();
        s.handle(AppEvent::Nav(Direction::Down));
        let effects = s.handle(AppEvent::Enter);
        assert_eq!(
            effects,
            vec![Effect::FetchFragment {
                request: 1,
                node_url: "Alpha/Bravo".into()
            }]
        );
    }

    #[test]
    fn keyword_enter_searches_and_updates_query_bar() {
        let mut s = state();
        s.handle(AppEvent::Enter);
        s.dispatch(Event::FragmentLoaded {
            request: 1,
            result: Ok(r#"<h1>Alpha</h1><span class="keyword">bravo</span>"#.into()),
        });
        s.handle(AppEvent::FocusNext);
        assert_eq!(s.focus, Focus::Content);
        s.handle(AppEvent::Enter);
        assert_eq!(s.session.query(), "bravo");
        assert_eq!(s.query.query, "bravo");
    }

    #[test]
    fn command_line_runs_commands_and_reports_errors() {
        let mut s = state();
        s.handle(AppEvent::Char(':'));
        assert_eq!(s.focus, Focus::Command);
        type_str(&mut s, "theme neon");
        s.handle(AppEvent::Enter);
        assert_eq!(s.focus, Focus::Command);
        assert!(s.command_bar.error.is_some());

        s.handle(AppEvent::Escape);
        s.handle(AppEvent::Char(':'));
        type_str(&mut s, "open Delta");
        let effects = s.handle(AppEvent::Enter);
        assert_eq!(s.focus, Focus::Nav);
        assert!(matches!(
            &effects[..],
            [Effect::FetchFragment { node_url, .. }] if node_url == "Delta"
        ));
    }

    #[test]
    fn help_popup_swallows_keys() {
        let mut s = state();
        s.handle(AppEvent::Char('?'));
        assert!(s.show_help);
        s.handle(AppEvent::Char('q'));
        assert!(!s.quit);
        s.handle(AppEvent::Escape);
        assert!(!s.show_help);
        s.handle(AppEvent::Quit);
        assert!(s.quit);
    }
}
