//! End-to-end test support for the tasklens engine.
//!
//! Integration tests under `tests/` exercise the public crate surface
//! only: records go in through a [`harness::InMemoryIndex`], queries go
//! in through [`tasklens_core::SearchEngine`], and assertions run on the
//! returned outcome. Nothing in here reaches into engine internals.

pub mod harness;
pub mod mocks;
