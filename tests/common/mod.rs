//! Shared test utilities for dsk-nav integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file.

#![allow(dead_code)]

pub mod builders;
pub mod fake_backend;
pub mod fixtures;

pub use builders::*;
pub use fake_backend::{FakeBackend, MANIFEST_KEY};
pub use fixtures::*;
