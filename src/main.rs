use anyhow::Context;
use clap::{Parser, ValueEnum};
use nav_backend::HttpBackend;
use nav_core::{config::Config, Location};
use std::path::PathBuf;
use std::process::ExitCode;

mod headless;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "dsk-nav", about = "Terminal navigator for design-system documentation")]
struct Cli {
    /// Start location, e.g. `/DisplayData/Table?grid`.
    location: Option<String>,

    /// Documentation server, overriding `server.base_url` from the config.
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Read configuration from this file instead of ~/.config/dsk-nav/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the navigation and content for the location, then exit.
    #[arg(long)]
    headless: bool,

    /// Output format for --headless.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write debug logs to /tmp/dsk-nav-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/dsk-nav-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("dsk-nav debug log started, tail -f /tmp/dsk-nav-debug.log");
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => Config::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "config unreadable, using defaults");
            Config::defaults()
        }),
    };
    if let Some(server) = cli.server {
        config.server.base_url = server;
    }

    let location = Location::parse(cli.location.as_deref().unwrap_or("/"));
    let backend = HttpBackend::new(&config.server)?;
    let runtime = tokio::runtime::Runtime::new()?;

    if cli.headless {
        return runtime.block_on(headless::run(config, location, backend, cli.format));
    }

    nav_tui::run(config, location, backend, runtime.handle().clone())?;
    Ok(ExitCode::SUCCESS)
}
