#![forbid(unsafe_code)]

//! Track lists shaped after the media-element `videoTracks` / `audioTracks`
//! surface.
//!
//! - [`Track`] is a shared handle; identity is the handle, not its fields.
//! - [`TrackList`] is the ordered container with `addtrack` / `removetrack` /
//!   `change` notifications.
//! - [`SelectionList`] layers the "at most one selected/enabled track" rule
//!   on top. [`VideoTrackList`] and [`AudioTrackList`] are its two flavours.

mod error;
mod guard;
mod list;
mod selection;
mod track;
mod types;

pub use error::{TrackError, TrackResult};
pub use guard::ReentrancyGuard;
pub use list::{TrackList, TrackListEvent};
pub use selection::{AudioTrackList, SelectionList, VideoTrackList};
pub use track::{Audio, AudioTrack, Track, TrackId, TrackInit, TrackKind, Video, VideoTrack};
pub use types::ObserverId;
