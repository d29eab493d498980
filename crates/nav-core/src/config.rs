//! Configuration types for dsk-nav.
//!
//! [`Config::load`] reads `~/.config/dsk-nav/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[server]
base_url             = "http://127.0.0.1:8080"
manifest_path        = "/api/tree"
fragment_prefix      = "/tree"
request_timeout_secs = 10

[search]
threshold             = 0.1
location              = 0
distance              = 100
max_pattern_length    = 32
min_match_char_length = 1

[ui]
nav_pane_width_pct = 30
theme              = "default"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/dsk-nav/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// `[server]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Scheme, host and port of the documentation backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the manifest endpoint.
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,
    /// Path prefix under which the backend serves node fragments. It is also
    /// what gets stripped from link targets to form the location path.
    #[serde(default = "default_fragment_prefix")]
    pub fragment_prefix: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String { "http://127.0.0.1:8080".to_string() }
fn default_manifest_path() -> String { "/api/tree".to_string() }
fn default_fragment_prefix() -> String { "/tree".to_string() }
fn default_request_timeout_secs() -> u64 { 10 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            manifest_path: default_manifest_path(),
            fragment_prefix: default_fragment_prefix(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// `[search]` section of `config.toml`.
///
/// The names follow the fuzzy-search options the web client was tuned with:
/// a match is accepted when `gaps / pattern_len + |first - location| / distance`
/// stays at or below `threshold`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_location")]
    pub location: usize,
    #[serde(default = "default_distance")]
    pub distance: usize,
    #[serde(default = "default_max_pattern_length")]
    pub max_pattern_length: usize,
    #[serde(default = "default_min_match_char_length")]
    pub min_match_char_length: usize,
}

fn default_threshold() -> f64 { 0.1 }
fn default_location() -> usize { 0 }
fn default_distance() -> usize { 100 }
fn default_max_pattern_length() -> usize { 32 }
fn default_min_match_char_length() -> usize { 1 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            location: default_location(),
            distance: default_distance(),
            max_pattern_length: default_max_pattern_length(),
            min_match_char_length: default_min_match_char_length(),
        }
    }
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_nav_pane_width_pct")]
    pub nav_pane_width_pct: u16,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_nav_pane_width_pct() -> u16 { 30 }
fn default_theme() -> String { "default".to_string() }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            nav_pane_width_pct: default_nav_pane_width_pct(),
            theme: default_theme(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/dsk-nav/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load `path` layered on top of the built-in defaults. A missing file
    /// yields the defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("dsk-nav")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert_eq!(cfg.server.manifest_path, "/api/tree");
        assert_eq!(cfg.server.fragment_prefix, "/tree");
        assert_eq!(cfg.search.threshold, 0.1);
        assert_eq!(cfg.search.distance, 100);
        assert_eq!(cfg.ui.nav_pane_width_pct, 30);
    }

    #[test]
    fn user_file_overrides_single_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nbase_url = \"http://docs.internal:9000\"\n\n[search]\nthreshold = 0.3\n",
        )
        .unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.server.base_url, "http://docs.internal:9000");
        assert_eq!(cfg.server.fragment_prefix, "/tree");
        assert_eq!(cfg.search.threshold, 0.3);
        assert_eq!(cfg.search.max_pattern_length, 32);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.server.request_timeout_secs, 10);
        assert_eq!(cfg.ui.theme, "default");
    }
}
