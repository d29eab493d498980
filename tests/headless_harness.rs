//! Headless mode process-level integration harness.
//!
//! # What this covers
//!
//! This harness runs the compiled `dsk-nav` binary against the fake
//! documentation server and checks what a user or a script would observe:
//!
//! - **Text output**: location header, match count, filtered outline, and the
//!   loaded content with its breadcrumb and keywords.
//! - **JSON output**: parsed and checked field by field.
//! - **Exit codes**: success = 0; unreachable manifest, failed fragment, and
//!   bad server url = non-zero, with the reason on stderr.
//!
//! Every run passes `--config` pointing into a temp dir so the user's own
//! config is neither read nor created.
//!
//! # What this does NOT cover
//!
//! - TUI rendering (that requires a real terminal)
//!
//! # Running
//!
//! ```sh
//! cargo test --test headless_harness
//! ```

mod common;
use common::*;

use pretty_assertions::assert_eq;
use std::process::Output;
use tempfile::TempDir;
use tokio::process::Command;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn run_headless(server: &str, args: &[&str]) -> Output {
    let dir = TempDir::new().expect("temp dir");
    let config = dir.path().join("config.toml");
    Command::new(env!("CARGO_BIN_EXE_dsk-nav"))
        .arg("--headless")
        .arg("--config")
        .arg(&config)
        .arg("--server")
        .arg(server)
        .args(args)
        .output()
        .await
        .expect("dsk-nav binary runs")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

#[tokio::test]
async fn text_root_prints_full_outline() {
    let server = FakeBackend::start_site().await;
    let out = run_headless(&server.base_url(), &[]).await;

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), format!("# /\n{FULL_OUTLINE}"));
}

#[tokio::test]
async fn text_deep_location_prints_filter_and_content() {
    let server = FakeBackend::start_site().await;
    let out = run_headless(&server.base_url(), &["/DisplayData/Table?grid"]).await;

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(
        text.starts_with("# /DisplayData/Table?grid\n(1 match)\n~ DisplayData\n  - Table\n"),
        "got:\n{text}"
    );
    assert!(text.contains("== DisplayData › Table =="), "got:\n{text}");
    assert!(text.contains("About Table."), "got:\n{text}");
    assert!(text.trim_end().ends_with("keywords: grid, tabular"), "got:\n{text}");
}

#[tokio::test]
async fn text_reports_plural_match_count() {
    let server = FakeBackend::start_site().await;
    let out = run_headless(&server.base_url(), &["/?input"]).await;

    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        "# /?input\n(3 matches)\n- Inputs\n  - Text Field\n  - Button\n"
    );
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

#[tokio::test]
async fn json_output_is_structured() {
    let server = FakeBackend::start_site().await;
    let out = run_headless(
        &server.base_url(),
        &["--format", "json", "/Feedback/Dialog?modal"],
    )
    .await;

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is JSON");
    assert_eq!(v["location"], "/Feedback/Dialog?modal");
    assert_eq!(v["query"], "modal");
    assert_eq!(v["matches"], 1);
    assert_eq!(v["nav"][0]["title"], "Feedback");
    assert_eq!(v["nav"][0]["ghosted"], true);
    assert_eq!(v["nav"][0]["children"][0]["href"], "/tree/Feedback/Dialog");
    assert_eq!(v["content"]["node_url"], "Feedback/Dialog");
    assert_eq!(v["content"]["title"], "Dialog");
    assert_eq!(v["content"]["crumbs"], serde_json::json!(["Feedback", "Dialog"]));
    assert_eq!(v["content"]["keywords"], serde_json::json!(["modal"]));
}

#[tokio::test]
async fn json_root_has_null_content_and_matches() {
    let server = FakeBackend::start_site().await;
    let out = run_headless(&server.base_url(), &["--format", "json"]).await;

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is JSON");
    assert!(v["content"].is_null());
    assert!(v["matches"].is_null());
    assert_eq!(v["nav"].as_array().map(Vec::len), Some(3));
}

// ---------------------------------------------------------------------------
// Exit codes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_manifest_exits_nonzero() {
    let server = FakeBackend::start_site().await;
    server.fail(MANIFEST_KEY, 500).await;
    let out = run_headless(&server.base_url(), &[]).await;

    assert!(!out.status.success());
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("navigation unavailable"), "stderr: {}", stderr(&out));
}

#[tokio::test]
async fn failed_fragment_prints_nav_and_exits_nonzero() {
    let server = FakeBackend::start_site().await;
    server.fail("Inputs/Button", 502).await;
    let out = run_headless(&server.base_url(), &["/Inputs/Button"]).await;

    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out), format!("# /Inputs/Button\n{FULL_OUTLINE}"));
    assert!(stderr(&out).contains("failed to load Inputs/Button"), "stderr: {}", stderr(&out));
}

#[tokio::test]
async fn invalid_server_url_exits_nonzero() {
    let out = run_headless("not a url", &[]).await;
    assert!(!out.status.success());
    assert!(!stderr(&out).is_empty());
}
