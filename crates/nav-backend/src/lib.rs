//! nav-backend: the network side of dsk-nav.
//!
//! [`HttpBackend`] implements [`nav_core::Backend`] against a documentation
//! server. The [`runner`] turns the session's [`nav_core::Effect`]s into
//! fetches and feeds their results back as [`nav_core::Event`]s.

pub mod http;
pub mod runner;

pub use http::{BackendError, HttpBackend};
pub use runner::{execute, settle, spawn};
