use std::sync::Arc;

use crate::types::{Cue, TextTrackDescriptor};

/// Closed set of engine events a surface can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum EngineEventKind {
    ManifestLoaded,
    LevelsUpdated,
    LevelSwitched,
    AudioTracksUpdated,
    AudioTrackSwitched,
    SubtitleTrackSwitch,
    NonNativeTextTracksFound,
    CuesParsed,
    MediaDetaching,
}

/// Events emitted by the engine, with their payloads.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum EngineEvent {
    /// Master playlist parsed; levels and renditions are known.
    ManifestLoaded,
    /// The level list changed after the manifest was loaded.
    LevelsUpdated,
    /// Playback now runs on `level`.
    LevelSwitched { level: usize },
    /// The audio rendition list changed.
    AudioTracksUpdated,
    /// Audio rendition `id` is now active.
    AudioTrackSwitched { id: usize },
    /// Subtitle rendition `id` is now active, `None` turns subtitles off.
    SubtitleTrackSwitch { id: Option<usize> },
    /// Subtitle renditions the surface must render itself.
    NonNativeTextTracksFound { tracks: Vec<TextTrackDescriptor> },
    /// A batch of cues for the active subtitle rendition.
    CuesParsed { cues: Vec<Cue> },
    /// The engine is about to release the media surface.
    MediaDetaching,
}

impl EngineEvent {
    #[must_use]
    pub fn kind(&self) -> EngineEventKind {
        match self {
            Self::ManifestLoaded => EngineEventKind::ManifestLoaded,
            Self::LevelsUpdated => EngineEventKind::LevelsUpdated,
            Self::LevelSwitched { .. } => EngineEventKind::LevelSwitched,
            Self::AudioTracksUpdated => EngineEventKind::AudioTracksUpdated,
            Self::AudioTrackSwitched { .. } => EngineEventKind::AudioTrackSwitched,
            Self::SubtitleTrackSwitch { .. } => EngineEventKind::SubtitleTrackSwitch,
            Self::NonNativeTextTracksFound { .. } => EngineEventKind::NonNativeTextTracksFound,
            Self::CuesParsed { .. } => EngineEventKind::CuesParsed,
            Self::MediaDetaching => EngineEventKind::MediaDetaching,
        }
    }
}

pub type EngineHandler = Arc<dyn Fn(&EngineEvent) + Send + Sync>;

/// Registration handle returned by [`StreamingEngine::subscribe`].
///
/// [`StreamingEngine::subscribe`]: crate::StreamingEngine::subscribe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);
