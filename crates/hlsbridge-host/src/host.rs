use std::{sync::Arc, time::SystemTime};

use hlsbridge_time::TimeRanges;

use crate::text_track::{TextTrack, TextTrackInit};

/// MIME type of HLS playlists.
pub const HLS_MIME_TYPE: &str = "application/vnd.apple.mpegurl";

/// Answer of `canPlayType`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CanPlay {
    #[default]
    No,
    Maybe,
    Probably,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HostObserverId(pub u64);

pub type TextTracksListener = Arc<dyn Fn() + Send + Sync>;

/// The native media element behind the bridge.
///
/// Every method reflects the element's own behaviour, before any
/// engine-driven override.
pub trait MediaHost: Send + Sync + 'static {
    fn native_seekable(&self) -> Arc<dyn TimeRanges>;

    fn native_src(&self) -> Option<String>;

    fn set_native_src(&self, src: &str);

    fn current_time(&self) -> f64;

    fn set_current_time(&self, time: f64);

    /// Non-standard timeline origin, where the platform has one.
    fn native_start_date(&self) -> Option<SystemTime>;

    fn can_play_type(&self, mime: &str) -> CanPlay;

    // -- text tracks --

    fn text_tracks(&self) -> Vec<Arc<dyn TextTrack>>;

    /// Insert an out-of-band text track child and return its track.
    fn add_text_track(&self, init: TextTrackInit) -> Arc<dyn TextTrack>;

    /// Remove a child previously created by [`add_text_track`](Self::add_text_track).
    fn remove_text_track(&self, track: &Arc<dyn TextTrack>);

    /// Listen for the text-track list `change` event.
    fn on_text_tracks_change(&self, listener: TextTracksListener) -> HostObserverId;

    fn off_text_tracks_change(&self, id: HostObserverId);
}
