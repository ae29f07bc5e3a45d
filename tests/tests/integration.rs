//! All integration tests for hlsbridge
#![expect(
    clippy::unwrap_used,
    reason = "integration test crate, unwraps are acceptable in test code"
)]

mod hlsbridge;
