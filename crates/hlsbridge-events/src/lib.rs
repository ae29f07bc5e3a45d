#![forbid(unsafe_code)]

//! Event bus for the media bridge.

mod attach;
mod bus;
mod event;
mod subtitle;
mod track;

pub use attach::AttachEvent;
pub use bus::EventBus;
pub use event::Event;
pub use subtitle::SubtitleEvent;
pub use track::{SelectionOrigin, TrackEvent};
