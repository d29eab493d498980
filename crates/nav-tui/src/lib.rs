//! dsk-nav TUI: ratatui application shell.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;

use nav_core::{config::Config, Backend, Location};
use tokio::runtime::Handle;

/// Start the TUI at `location`. Fetches run on `runtime`; this call blocks
/// the current thread until the user quits.
pub fn run<B: Backend>(
    config: Config,
    location: Location,
    backend: B,
    runtime: Handle,
) -> anyhow::Result<()> {
    let theme = theme::Theme::by_name(&config.ui.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.ui.theme, "unknown theme, using default");
        theme::Theme::load_default()
    });
    App::new(config, location, backend, theme, runtime).run()
}
