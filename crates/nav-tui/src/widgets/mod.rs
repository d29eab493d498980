//! Ratatui widgets for the dsk-nav TUI.

pub mod command_bar;
pub mod content_pane;
pub mod help;
pub mod location_bar;
pub mod nav_tree;
pub mod query_bar;
