use crate::{AttachEvent, SubtitleEvent, TrackEvent};

/// Unified event for the media bridge.
///
/// Hierarchical: each concern has its own variant with a sub-enum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Attach(AttachEvent),
    Track(TrackEvent),
    Subtitle(SubtitleEvent),
}

impl From<AttachEvent> for Event {
    fn from(e: AttachEvent) -> Self {
        Self::Attach(e)
    }
}

impl From<TrackEvent> for Event {
    fn from(e: TrackEvent) -> Self {
        Self::Track(e)
    }
}

impl From<SubtitleEvent> for Event {
    fn from(e: SubtitleEvent) -> Self {
        Self::Subtitle(e)
    }
}
