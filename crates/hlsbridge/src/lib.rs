#![forbid(unsafe_code)]

//! # hlsbridge
//!
//! Presents an adaptive streaming engine through a media-element-like
//! surface: `videoTracks` / `audioTracks` lists kept in sync with the
//! engine's level and audio selection, a `seekable` window derived from
//! fragment timing, and subtitle renditions rendered as host text tracks.
//!
//! ```ignore
//! use hlsbridge::{BridgeConfig, MediaBridge};
//!
//! let config = BridgeConfig::default().with_factory(factory);
//! let bridge = MediaBridge::attach(host, config)?;
//! bridge.set_src("https://cdn.example/live/master.m3u8")?;
//!
//! if let Some(video) = bridge.video_tracks() {
//!     video.item(1)?.set_selected(true);
//! }
//! let host = bridge.detach();
//! ```

mod bridge;
mod config;
mod error;
mod state;
mod subscriptions;
mod sync;

pub use bridge::MediaBridge;
pub use config::BridgeConfig;
pub use error::{BridgeError, BridgeResult};
pub use state::AttachPhase;

// ── Re-export sub-crates ────────────────────────────────────────────────

pub mod engine {
    pub use hlsbridge_engine::*;
}

pub mod events {
    pub use hlsbridge_events::*;
}

pub mod host {
    pub use hlsbridge_host::*;
}

pub mod text {
    pub use hlsbridge_text::*;
}

pub mod time {
    pub use hlsbridge_time::*;
}

pub mod tracks {
    pub use hlsbridge_tracks::*;
}
