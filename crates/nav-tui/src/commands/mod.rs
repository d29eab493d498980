// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

use crate::{app::AppState, theme::Theme};
use nav_core::{Effect, Event};

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    // Toggle the help popup
    Help,
    Theme(String),
    // Empty the search query
    Clear,
    Back,
    Forward,
    // Load the content of the node at this path
    Open(String),
    // Retry the manifest after a failed load
    Reload,
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// An empty string returns `Err("")` as a sentinel meaning "close without
    /// acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" | "q!" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            "clear" => Ok(Command::Clear),
            "back" | "b" => Ok(Command::Back),
            "forward" | "f" => Ok(Command::Forward),
            "reload" => Ok(Command::Reload),
            "theme" if rest.is_empty() => Err("usage: theme <default|gruvbox>".to_string()),
            "theme" => Ok(Command::Theme(rest.to_string())),
            "open" | "o" if rest.trim_matches('/').is_empty() => {
                Err("usage: open <path>".to_string())
            }
            "open" | "o" => Ok(Command::Open(rest.to_string())),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Execute a parsed [`Command`] against the application state. Returns the
/// session effects to run, or a message for the command bar.
pub fn execute_command(s: &mut AppState, cmd: Command) -> Result<Vec<Effect>, String> {
    let effects = match cmd {
        Command::Quit => {
            s.quit = true;
            Vec::new()
        }
        Command::Help => {
            s.show_help = !s.show_help;
            Vec::new()
        }
        Command::Theme(name) => {
            s.theme = Theme::by_name(&name).ok_or_else(|| format!("unknown theme: {name}"))?;
            Vec::new()
        }
        Command::Clear => s.dispatch(Event::ClearSearch),
        Command::Back => s.dispatch(Event::HistoryBack),
        Command::Forward => s.dispatch(Event::HistoryForward),
        Command::Open(path) => {
            let href = format!(
                "{}/{}",
                s.session.fragment_prefix().trim_end_matches('/'),
                path.trim_matches('/')
            );
            s.dispatch(Event::NavActivated(href))
        }
        Command::Reload => s.dispatch(Event::Reload),
    };
    Ok(effects)
}
