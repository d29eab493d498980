//! Headless mode: resolve a location once and print the result.
//!
//! Runs the same session the TUI runs, drives its effects to completion,
//! then prints the filtered navigation and the loaded content. Useful for
//! scripting and for checking that a shared location reproduces a view.

use crate::Format;
use nav_backend::HttpBackend;
use nav_core::{config::Config, outline, ContentStatus, Location, NavStatus, Session};
use std::fmt::Write as _;
use std::process::ExitCode;

pub async fn run(
    config: Config,
    location: Location,
    backend: HttpBackend,
    format: Format,
) -> anyhow::Result<ExitCode> {
    let (mut session, effects) = Session::new(
        location,
        config.search.clone(),
        config.server.fragment_prefix.clone(),
    );
    nav_backend::settle(&mut session, &backend, effects).await;

    if let NavStatus::Failed(reason) = session.nav_status() {
        anyhow::bail!("navigation unavailable: {reason}");
    }

    let out = match format {
        Format::Text => render_text(&session),
        Format::Json => serde_json::to_string_pretty(&render_json(&session))?,
    };
    println!("{out}");

    match session.content_status() {
        ContentStatus::Failed { node_url, reason } => {
            eprintln!("error: failed to load {node_url}: {reason}");
            Ok(ExitCode::FAILURE)
        }
        _ => Ok(ExitCode::SUCCESS),
    }
}

fn render_text(session: &Session) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", session.location());
    match session.match_count() {
        Some(1) => out.push_str("(1 match)\n"),
        Some(n) => {
            let _ = writeln!(out, "({n} matches)");
        }
        None => {}
    }
    out.push_str(&outline(session.nav()));

    if let Some(fragment) = session.content() {
        let _ = writeln!(out, "\n== {} ==", session.crumbs().join(" › "));
        for line in &fragment.lines {
            let _ = writeln!(out, "{line}");
        }
        if !fragment.keywords.is_empty() {
            let _ = writeln!(out, "\nkeywords: {}", fragment.keywords.join(", "));
        }
    }
    out.trim_end().to_string()
}

fn render_json(session: &Session) -> serde_json::Value {
    let content = session.content().map(|f| {
        serde_json::json!({
            "node_url": f.node_url,
            "title": f.title,
            "crumbs": session.crumbs(),
            "lines": f.lines,
            "keywords": f.keywords,
        })
    });
    serde_json::json!({
        "location": session.location().to_string(),
        "query": session.query(),
        "matches": session.match_count(),
        "nav": session.nav(),
        "content": content,
    })
}
