#![forbid(unsafe_code)]

//! The host media element, reduced to what the bridge reads and writes.

mod error;
mod host;
mod text_track;

pub use error::CueError;
pub use host::{CanPlay, HLS_MIME_TYPE, HostObserverId, MediaHost, TextTracksListener};
#[cfg(any(test, feature = "test-utils"))]
pub use text_track::TextTrackMock;
pub use text_track::{TextTrack, TextTrackInit, TextTrackMode, matches_rendition};
