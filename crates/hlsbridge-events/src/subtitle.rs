/// Subtitle bridging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtitleEvent {
    /// Host text tracks created for engine-rendered renditions.
    TracksSynthesized { count: usize },
    /// Active subtitle rendition changed. `None` turns subtitles off.
    Switched { id: Option<String> },
    /// A cue batch was inserted.
    CuesAdded { added: usize, skipped: usize },
    /// The host refused a cue and its minimal form.
    CueDropped { id: String },
}
