#![forbid(unsafe_code)]
#![expect(
    clippy::unwrap_used,
    reason = "test utility crate, unwraps are acceptable"
)]

//! Shared test utilities for the hlsbridge workspace.

pub mod fake_engine;
pub mod fake_host;
pub mod fixtures;

pub use fake_engine::{EngineCalls, FakeEngine, FakeEngineFactory};
pub use fake_host::{FakeHost, FakeTextTrack};
pub use fixtures::*;
