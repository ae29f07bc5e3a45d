use hlsbridge_engine::{Cue, Rendition, TextTrackKind};

use crate::error::CueError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextTrackMode {
    #[default]
    Disabled,
    Hidden,
    Showing,
}

/// Attributes of a synthesized text track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextTrackInit {
    pub kind: TextTrackKind,
    pub label: String,
    pub language: String,
    pub mode: TextTrackMode,
}

/// A host text track.
#[cfg_attr(
    any(test, feature = "test-utils"),
    unimock::unimock(api = TextTrackMock)
)]
pub trait TextTrack: Send + Sync + 'static {
    fn kind(&self) -> TextTrackKind;

    fn label(&self) -> String;

    fn language(&self) -> String;

    fn mode(&self) -> TextTrackMode;

    fn set_mode(&self, mode: TextTrackMode);

    /// Whether a cue with this id is already on the track.
    fn has_cue(&self, id: &str) -> bool;

    fn cue_count(&self) -> usize;

    fn add_cue(&self, cue: &Cue) -> Result<(), CueError>;
}

/// Structural match of a host track against a subtitle rendition:
/// same kind, label and language.
pub fn matches_rendition(track: &dyn TextTrack, rendition: &Rendition) -> bool {
    rendition.text_kind() == Some(track.kind())
        && track.label() == rendition.name
        && track.language() == rendition.lang.as_deref().unwrap_or_default()
}
